//! Browser pages
//!
//! The UI is three server-rendered pages: the upload form, the result and an
//! error page. Everything user-controlled goes through `html_escape`.

use axum::http::StatusCode;
use html_escape::encode_text;

use crate::outcome::SkipReason;
use crate::pipeline::PipelineReport;

pub const TITLE: &str = "PDF Summarizer";
pub const PROCESSING_LABEL: &str = "Uploading and processing the file...";
pub const GENERATING_LABEL: &str = "Generating the summary...";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
h1 { font-size: 1.8rem; }
.summary { white-space: pre-wrap; line-height: 1.5; background: #f6f6f6; padding: 1rem; border-radius: 6px; }
.meta { color: #666; font-size: 0.9rem; }
.spinner { display: none; margin-top: 1rem; }
.spinner.active { display: block; }
.spinner li { list-style: none; }
.spinner li::before { content: "\23F3  "; }
.error { color: #a00; }
"#;

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = TITLE,
        style = STYLE,
        body = body,
    )
}

/// Upload form. Shows the progress labels once the form is submitted.
pub fn upload_page() -> String {
    layout(&format!(
        r#"<form action="/summarize" method="post" enctype="multipart/form-data"
      onsubmit="document.getElementById('spinner').classList.add('active')">
  <label for="file">Upload a PDF file</label><br>
  <input type="file" id="file" name="file" accept=".pdf,application/pdf" required>
  <button type="submit">Summarize</button>
</form>
<ul id="spinner" class="spinner">
  <li>{processing}</li>
  <li>{generating}</li>
</ul>"#,
        processing = PROCESSING_LABEL,
        generating = GENERATING_LABEL,
    ))
}

/// Result of one pipeline run
pub fn result_page(report: &PipelineReport) -> String {
    let body = match report.summary.skip_reason() {
        Some(SkipReason::NoTextLayer) | Some(SkipReason::EmptyInput) => {
            "<p>No extractable text was found in this PDF. Scanned documents need OCR before they can be summarized.</p>".to_string()
        }
        _ => format!(
            "<div class=\"summary\">{}</div>",
            encode_text(report.summary_text())
        ),
    };

    let compression = match report.compression.produced() {
        Some(reduced) => format!(
            "pages rescaled by {:.2} ({} → {} bytes)",
            reduced.scale, reduced.input_bytes, reduced.output_bytes
        ),
        None => "no size reduction needed".to_string(),
    };

    layout(&format!(
        "<h2>{heading}:</h2>\n{body}\n<p class=\"meta\">{file} · {bytes} bytes · {compression} · \
         {chars} characters in {chunks} chunk(s)</p>\n<p><a href=\"/\">Summarize another PDF</a></p>",
        heading = report.heading(),
        body = body,
        file = encode_text(&report.file_name),
        bytes = report.input_bytes,
        compression = compression,
        chars = report.text_chars,
        chunks = report.chunk_count(),
    ))
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    layout(&format!(
        "<h2 class=\"error\">Error {code}</h2>\n<p>{message}</p>\n<p><a href=\"/\">Try again</a></p>",
        code = status.as_u16(),
        message = encode_text(message),
    ))
}
