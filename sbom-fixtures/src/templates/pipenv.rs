//! Pipenv fixture: Flask + redis service

use crate::registry::{FileRole, GeneratedFile, GeneratorContext};

/// Pipfile with a PyPI source and dev packages
pub const PIPFILE: &str = r#"[[source]]
url = "https://pypi.org/simple"
verify_ssl = true
name = "pypi"

[packages]
requests = ">=2.25.0"
flask = ">=2.3.0"
gunicorn = ">=21.0.0"
redis = ">=4.5.0"

[dev-packages]
pytest = ">=7.0.0"
flask-testing = ">=0.8.1"
coverage = ">=7.0.0"
flake8 = ">=6.0.0"

[requires]
python_version = "3.8"

[scripts]
dev = "python app.py"
test = "pytest"
"#;

/// Flask application backed by redis
pub const APP_PY: &str = r#"from flask import Flask, jsonify
import requests
import redis

app = Flask(__name__)
redis_client = redis.Redis(host='localhost', port=6379, db=0, decode_responses=True)

@app.route('/')
def hello():
    return jsonify({"message": "Hello from Flask!"})

@app.route('/fetch')
def fetch_data():
    try:
        response = requests.get("https://httpbin.org/json")
        return jsonify({"status": response.status_code, "data": response.json()})
    except Exception as e:
        return jsonify({"error": str(e)}), 500

@app.route('/cache/<key>')
def get_cache(key):
    value = redis_client.get(key)
    return jsonify({"key": key, "value": value})

if __name__ == '__main__':
    app.run(debug=True)
"#;

/// Generate the Pipenv project files
#[must_use]
pub fn generate(_ctx: &GeneratorContext) -> Vec<GeneratedFile> {
    vec![
        GeneratedFile::new(
            "Pipfile",
            PIPFILE,
            FileRole::Manifest,
            "Pipfile with packages and dev-packages",
        ),
        GeneratedFile::new("app.py", APP_PY, FileRole::Source, "Flask app with redis cache"),
    ]
}
