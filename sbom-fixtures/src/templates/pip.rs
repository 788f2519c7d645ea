//! pip fixture: requirements files plus a setuptools package

use crate::registry::{FileRole, GeneratedFile, GeneratorContext};

/// Runtime requirements, including Flask's transitive dependencies
pub const REQUIREMENTS_TXT: &str = "requests>=2.31.0
flask>=2.3.0
jinja2>=3.1.0
werkzeug>=2.3.0
markupsafe>=2.1.0
itsdangerous>=2.1.0
click>=8.1.0
blinker>=1.6.0
urllib3>=2.0.0
certifi>=2023.7.0
charset-normalizer>=3.3.0
idna>=3.6
";

/// Development requirements
pub const REQUIREMENTS_DEV_TXT: &str = "pytest>=7.4.0
pytest-flask>=1.3.0
coverage>=7.3.0
black>=23.12.0
flake8>=6.1.0
mypy>=1.8.0
";

/// setuptools packaging script
pub const SETUP_PY: &str = r#"from setuptools import setup, find_packages

setup(
    name="test-pip-project",
    version="0.1.0",
    description="Test project for pip SBOM generation",
    author="Test User",
    author_email="test@example.com",
    packages=find_packages(),
    install_requires=[
        "requests>=2.25.0",
        "flask>=2.3.0",
    ],
    python_requires=">=3.8",
)
"#;

/// Flask proxy server
pub const SERVER_PY: &str = r#"from flask import Flask, request, jsonify
import requests

app = Flask(__name__)

@app.route('/')
def index():
    return "Hello from pip-managed Flask app!"

@app.route('/proxy')
def proxy():
    url = request.args.get('url', 'https://httpbin.org/json')
    try:
        response = requests.get(url, timeout=10)
        return jsonify({
            "url": url,
            "status_code": response.status_code,
            "response": response.json() if response.headers.get('content-type', '').startswith('application/json') else response.text
        })
    except Exception as e:
        return jsonify({"error": str(e)}), 500

if __name__ == '__main__':
    app.run(host='0.0.0.0', port=5000, debug=True)
"#;

/// Generate the pip project files
#[must_use]
pub fn generate(_ctx: &GeneratorContext) -> Vec<GeneratedFile> {
    vec![
        GeneratedFile::new(
            "requirements.txt",
            REQUIREMENTS_TXT,
            FileRole::Manifest,
            "runtime requirements",
        ),
        GeneratedFile::new(
            "requirements-dev.txt",
            REQUIREMENTS_DEV_TXT,
            FileRole::DevRequirements,
            "development requirements",
        ),
        GeneratedFile::new(
            "setup.py",
            SETUP_PY,
            FileRole::BuildScript,
            "setuptools packaging",
        ),
        GeneratedFile::new("server.py", SERVER_PY, FileRole::Source, "Flask proxy server"),
    ]
}
