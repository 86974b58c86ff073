use axum::response::Html;

/// Serve the two-panel analyzer page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Spam &amp; Legitimacy Analyzer</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        @keyframes pulse { 0%, 100% { opacity: 1; } 50% { opacity: 0.5; } }
        .animate-pulse { animation: pulse 2s cubic-bezier(0.4, 0, 0.6, 1) infinite; }
        .result { white-space: pre-wrap; }
        .report { white-space: normal; }
        .report p { margin-bottom: 0.5rem; }
        .report ul { list-style: disc; margin-left: 1.5rem; }
        .report ol { list-style: decimal; margin-left: 1.5rem; }
    </style>
</head>
<body class="bg-gray-900 text-white min-h-screen flex flex-col">
    <div class="container mx-auto px-4 py-8 flex-1">
        <header class="mb-8">
            <h1 class="text-4xl font-bold text-blue-400">Spam &amp; Legitimacy Analyzer</h1>
            <p class="text-gray-400 mt-2">Classify a message as spam or ham, and ask an LLM whether a company looks legitimate.</p>
        </header>

        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            <!-- Spam Classifier -->
            <section id="spam-panel" class="bg-gray-800 rounded-lg p-6">
                <h2 class="text-xl font-semibold mb-4">Spam Classifier</h2>
                <label for="message" class="block text-gray-400 mb-2">Enter a message:</label>
                <textarea id="message" rows="6"
                    class="w-full bg-gray-700 rounded p-3 font-mono text-sm mb-4"></textarea>
                <button id="classify-btn"
                    class="bg-blue-600 hover:bg-blue-700 disabled:bg-gray-600 px-4 py-2 rounded">
                    Classify Message
                </button>
                <div id="classify-result" class="result mt-4"></div>
            </section>

            <!-- Company Legitimacy Checker -->
            <section id="legitimacy-panel" class="bg-gray-800 rounded-lg p-6">
                <h2 class="text-xl font-semibold mb-4">Company Legitimacy Checker</h2>
                <label for="company" class="block text-gray-400 mb-2">Enter a company name:</label>
                <input id="company" type="text"
                    class="w-full bg-gray-700 rounded p-3 text-sm mb-4">
                <button id="legitimacy-btn"
                    class="bg-blue-600 hover:bg-blue-700 disabled:bg-gray-600 px-4 py-2 rounded">
                    Check Legitimacy
                </button>
                <div id="legitimacy-result" class="result mt-4"></div>
            </section>
        </div>
    </div>

    <footer class="text-center text-gray-500 text-sm py-4">
        Spam classification runs locally on a fine-tuned BERT model. Legitimacy reports come from a hosted LLM and may be inaccurate.
    </footer>

    <script>
        const STYLES = {
            rendered: 'text-green-400',
            warning: 'text-yellow-400',
            error: 'text-red-400',
        };

        function show(el, outcome) {
            el.replaceChildren();
            const head = document.createElement('p');
            head.className = STYLES[outcome.status] || '';
            head.textContent = outcome.message;
            el.appendChild(head);
            if (outcome.report_html) {
                // Rendered server-side with raw HTML escaped and links stripped
                const body = document.createElement('div');
                body.className = 'report mt-2 text-gray-200';
                body.innerHTML = outcome.report_html;
                el.appendChild(body);
            } else if (outcome.report) {
                const body = document.createElement('p');
                body.className = 'mt-2 text-gray-200';
                body.textContent = outcome.report;
                el.appendChild(body);
            }
        }

        async function post(path, body) {
            const res = await fetch(path, {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(body),
            });
            return res.json();
        }

        async function loadStatus() {
            try {
                const status = await (await fetch('/api/status')).json();
                if (!status.classifier_ready) {
                    document.getElementById('classify-btn').disabled = true;
                    document.getElementById('message').disabled = true;
                    show(document.getElementById('classify-result'), {
                        status: 'error',
                        message: 'Spam classification model could not be loaded. Please check the model files.',
                    });
                }
            } catch (e) {
                console.error('Failed to load status:', e);
            }
        }

        document.getElementById('classify-btn').addEventListener('click', async () => {
            const btn = document.getElementById('classify-btn');
            const out = document.getElementById('classify-result');
            btn.disabled = true;
            try {
                show(out, await post('/api/classify', {
                    message: document.getElementById('message').value,
                }));
            } catch (e) {
                show(out, { status: 'error', message: 'An error occurred: ' + e });
            } finally {
                btn.disabled = false;
            }
        });

        document.getElementById('legitimacy-btn').addEventListener('click', async () => {
            const btn = document.getElementById('legitimacy-btn');
            const out = document.getElementById('legitimacy-result');
            const company = document.getElementById('company').value;
            btn.disabled = true;
            if (company.trim()) {
                out.replaceChildren();
                const pending = document.createElement('p');
                pending.className = 'text-gray-400 animate-pulse';
                pending.textContent = 'Investigating ' + company + '...';
                out.appendChild(pending);
            }
            try {
                show(out, await post('/api/legitimacy', { company_name: company }));
            } catch (e) {
                show(out, { status: 'error', message: 'An error occurred: ' + e });
            } finally {
                btn.disabled = false;
            }
        });

        loadStatus();
    </script>
</body>
</html>
"#;
