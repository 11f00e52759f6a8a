//! Upload page
//!
//! A single self-contained HTML document: file picker, submit button and a
//! panel that shows the extracted text or the error returned by `/upload`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;

/// Serve the upload page
pub fn serve_upload_page(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    logger::log_page_served(UPLOAD_PAGE.len(), ctx.is_head);
    http::build_html_response(UPLOAD_PAGE, ctx.is_head)
}

const UPLOAD_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Adaptive Learning Platform - Upload Document</title>
    <style>
        * {
            box-sizing: border-box;
        }
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
            background: linear-gradient(135deg, #2575fc 0%, #6a11cb 100%);
            min-height: 100vh;
            margin: 0;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .container {
            background: #fff;
            color: #34495e;
            width: 90%;
            max-width: 640px;
            padding: 32px;
            border-radius: 20px;
            box-shadow: 0 10px 40px rgba(0, 0, 0, 0.3);
            text-align: center;
        }
        input[type=file] {
            width: 80%;
            padding: 14px;
            margin-bottom: 20px;
            border: 1px solid #ccc;
            border-radius: 10px;
        }
        button {
            padding: 12px 24px;
            border: none;
            border-radius: 12px;
            background: #2575fc;
            color: #fff;
            font-size: 1.1em;
            font-weight: 600;
            cursor: pointer;
        }
        button:disabled {
            background: #a0b8ff;
            cursor: not-allowed;
        }
        #spinner {
            display: none;
            width: 18px;
            height: 18px;
            margin-left: 10px;
            vertical-align: middle;
            border: 3px solid #d6e0f0;
            border-top-color: #2575fc;
            border-radius: 50%;
            animation: spin 1s linear infinite;
        }
        @keyframes spin {
            to { transform: rotate(360deg); }
        }
        #status {
            min-height: 24px;
            margin-top: 20px;
            font-weight: 600;
        }
        #status.error { color: #c0392b; }
        #status.success { color: #27ae60; }
        pre {
            max-height: 320px;
            overflow-y: auto;
            margin-top: 24px;
            padding: 20px;
            border-radius: 12px;
            background: #f4f7ff;
            color: #222;
            text-align: left;
            white-space: pre-wrap;
            word-wrap: break-word;
        }
    </style>
</head>
<body>
    <main class="container" aria-label="Upload your document">
        <h1>Upload Study Document</h1>
        <form id="uploadForm" action="/upload" method="post" enctype="multipart/form-data">
            <input type="file" id="fileInput" name="file" accept=".pdf,.txt,application/pdf,text/plain" aria-label="Choose a PDF or TXT file" required>
            <button type="submit">Upload <span id="spinner"></span></button>
        </form>
        <div id="status" role="status"></div>
        <pre id="extractedText" tabindex="0" aria-label="Extracted text"></pre>
    </main>
    <script>
        const form = document.getElementById('uploadForm');
        const fileInput = document.getElementById('fileInput');
        const button = form.querySelector('button');
        const spinner = document.getElementById('spinner');
        const statusLine = document.getElementById('status');
        const output = document.getElementById('extractedText');

        function setBusy(busy) {
            spinner.style.display = busy ? 'inline-block' : 'none';
            button.disabled = busy;
        }

        function showStatus(message, kind) {
            statusLine.textContent = message;
            statusLine.className = kind;
        }

        form.addEventListener('submit', async (event) => {
            event.preventDefault();
            output.textContent = '';
            showStatus('', '');

            const file = fileInput.files[0];
            if (!file) {
                showStatus('Please select a file!', 'error');
                return;
            }

            const body = new FormData();
            body.append('file', file);
            setBusy(true);
            try {
                const res = await fetch('/upload', { method: 'POST', body });
                const data = await res.json().catch(() => ({}));
                if (!res.ok) {
                    throw new Error(data.error || ('Upload failed with status ' + res.status));
                }
                output.textContent = data.text || 'No text extracted.';
                showStatus('Document processed successfully!', 'success');
            } catch (err) {
                showStatus('Error: ' + err.message, 'error');
            } finally {
                setBusy(false);
            }
        });
    </script>
</body>
</html>
"#;
