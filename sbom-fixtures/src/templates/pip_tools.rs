//! pip-tools fixture: `.in` sources with a pre-compiled pinned lock

use crate::registry::{FileRole, GeneratedFile, GeneratorContext};

/// Direct production dependencies
pub const REQUIREMENTS_IN: &str = "# Production dependencies
requests>=2.25.0
fastapi>=0.100.0
uvicorn[standard]>=0.20.0
pydantic>=2.0.0
sqlalchemy>=2.0.0
alembic>=1.12.0
";

/// Development dependencies layered on the production set
pub const REQUIREMENTS_DEV_IN: &str = "# Development dependencies
-r requirements.in
pytest>=7.0.0
pytest-asyncio>=0.21.0
httpx>=0.24.0
black>=23.0.0
isort>=5.12.0
mypy>=1.5.0
pre-commit>=3.0.0
";

/// Pinned body of `requirements.txt`, as `pip-compile requirements.in` would emit it
pub const REQUIREMENTS_TXT_BODY: &str = "alembic==1.13.2
    # via -r requirements.in
annotated-types==0.7.0
    # via pydantic
anyio==4.3.0
    # via
    #   starlette
    #   watchfiles
certifi==2024.2.2
    # via requests
charset-normalizer==3.3.2
    # via requests
click==8.1.7
    # via uvicorn
fastapi==0.110.0
    # via -r requirements.in
greenlet==3.0.3
    # via sqlalchemy
h11==0.14.0
    # via uvicorn
httptools==0.6.1
    # via uvicorn
idna==3.7
    # via
    #   anyio
    #   requests
mako==1.3.2
    # via alembic
markupsafe==2.1.5
    # via mako
pydantic==2.6.4
    # via
    #   -r requirements.in
    #   fastapi
pydantic-core==2.16.3
    # via pydantic
python-dotenv==1.0.1
    # via uvicorn
python-multipart==0.0.9
    # via fastapi
pyyaml==6.0.1
    # via uvicorn
requests==2.31.0
    # via -r requirements.in
sniffio==1.3.1
    # via anyio
sqlalchemy==2.0.29
    # via
    #   -r requirements.in
    #   alembic
starlette==0.36.3
    # via fastapi
typing-extensions==4.10.0
    # via
    #   alembic
    #   pydantic
    #   pydantic-core
    #   sqlalchemy
urllib3==2.2.1
    # via requests
uvicorn[standard]==0.29.0
    # via -r requirements.in
uvloop==0.19.0
    # via uvicorn
watchfiles==0.21.0
    # via uvicorn
websockets==12.0
    # via uvicorn
";

/// FastAPI service with a pydantic model and a requests-backed proxy
pub const API_PY: &str = r#"from fastapi import FastAPI, HTTPException
from pydantic import BaseModel
import requests
import uvicorn

app = FastAPI(title="Test API", version="0.1.0")

class HealthResponse(BaseModel):
    status: str
    version: str

class ProxyRequest(BaseModel):
    url: str
    method: str = "GET"

@app.get("/health", response_model=HealthResponse)
async def health():
    return HealthResponse(status="healthy", version="0.1.0")

@app.post("/proxy")
async def proxy_request(request: ProxyRequest):
    try:
        if request.method.upper() == "GET":
            response = requests.get(request.url, timeout=10)
        else:
            raise HTTPException(status_code=400, detail="Only GET method supported")

        return {
            "url": request.url,
            "method": request.method,
            "status_code": response.status_code,
            "headers": dict(response.headers),
            "body": response.text[:1000]  # Limit response size
        }
    except requests.RequestException as e:
        raise HTTPException(status_code=500, detail=f"Request failed: {str(e)}")

if __name__ == "__main__":
    uvicorn.run("api:app", host="0.0.0.0", port=8000, reload=True)
"#;

/// pip-compile header naming the Python version the lock was built with
#[must_use]
pub fn lock_header(python_version: &str) -> String {
    format!(
        "# This file is autogenerated by pip-compile with Python {python_version}\n\
         # To update, run:\n\
         #\n\
         #    pip-compile requirements.in\n\
         #\n"
    )
}

/// Generate the pip-tools project files
#[must_use]
pub fn generate(ctx: &GeneratorContext) -> Vec<GeneratedFile> {
    let lock = lock_header(&ctx.python_version) + REQUIREMENTS_TXT_BODY;

    vec![
        GeneratedFile::new(
            "requirements.in",
            REQUIREMENTS_IN,
            FileRole::Manifest,
            "direct production requirements",
        ),
        GeneratedFile::new(
            "requirements-dev.in",
            REQUIREMENTS_DEV_IN,
            FileRole::DevRequirements,
            "development requirements",
        ),
        GeneratedFile::new(
            "requirements.txt",
            lock,
            FileRole::LockFile,
            "pinned pip-compile output",
        ),
        GeneratedFile::new("api.py", API_PY, FileRole::Source, "FastAPI service"),
    ]
}
