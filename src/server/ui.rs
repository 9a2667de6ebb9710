//! Single-page HTML form UI

pub(super) const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Web Content Q&amp;A Tool</title>
<style>
  body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
  textarea, input[type=text] { width: 100%; box-sizing: border-box; font: inherit; }
  pre { background: #f4f4f4; padding: 0.75rem; white-space: pre-wrap; min-height: 2rem; }
  section { margin-bottom: 2rem; }
</style>
</head>
<body>
<h1>Web Content Q&amp;A Tool</h1>

<section>
  <h2>Process URLs</h2>
  <form id="urls-form" action="/ui/process_urls" method="post">
    <label for="urls">Enter URLs (one per line)</label>
    <textarea id="urls" name="urls" rows="5"></textarea>
    <button type="submit">Process URLs</button>
  </form>
  <h3>Status</h3>
  <pre id="urls-output"></pre>
</section>

<section>
  <h2>Ask Questions</h2>
  <form id="question-form" action="/ui/ask_question" method="post">
    <label for="question">Enter your question</label>
    <input type="text" id="question" name="question">
    <button type="submit">Ask Question</button>
  </form>
  <h3>Answer</h3>
  <pre id="question-output"></pre>
</section>

<script>
  function wire(formId, outputId) {
    const form = document.getElementById(formId);
    const output = document.getElementById(outputId);
    form.addEventListener("submit", async (event) => {
      event.preventDefault();
      output.textContent = "Working...";
      try {
        const response = await fetch(form.action, {
          method: "POST",
          body: new URLSearchParams(new FormData(form)),
        });
        output.textContent = await response.text();
      } catch (err) {
        output.textContent = "Request failed: " + err;
      }
    });
  }
  wire("urls-form", "urls-output");
  wire("question-form", "question-output");
</script>
</body>
</html>
"#;
