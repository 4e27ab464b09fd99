use axum::{response::Html, Router, routing::get};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Document Analyzer API</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; color: #1d1d1f; }
    .card { background: #f8f9fa; border-radius: 8px; padding: 1rem 1.25rem; margin: 1rem 0; }
    .endpoint { background: #e9ecef; padding: 0.6rem; border-radius: 4px; margin: 0.5rem 0; }
    code { background: #f1f3f4; padding: 2px 4px; border-radius: 3px; }
    pre { background: #f6f8fa; padding: 1rem; overflow: auto; }
  </style>
</head>
<body>
  <h1>Document Analyzer API</h1>
  <p>Backend for AI-powered document analysis.</p>

  <div class="card">
    <h2>Endpoints</h2>
    <div class="endpoint">
      <strong>POST /analyze/</strong><br />
      Upload a document (PDF, DOCX or plain text) as the <code>file</code> field of a multipart form.
    </div>
    <div class="endpoint">
      <strong>GET /health</strong><br />
      Liveness check.
    </div>
    <div class="endpoint">
      <strong>GET /</strong><br />
      This page.
    </div>
  </div>

  <div class="card">
    <h2>Usage</h2>
    <pre>curl -F "file=@contract.pdf" http://localhost:8000/analyze/</pre>
    <p>The response carries the original filename and an <code>analysis</code> object with
    <code>summary</code>, <code>key_clauses</code>, <code>risks</code> and <code>next_steps</code>.</p>
  </div>

  <div class="card">
    <h2>Status</h2>
    <p>API is running and ready to analyze documents.</p>
  </div>
</body>
</html>"#)
}
