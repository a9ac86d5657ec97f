//! Single-page UI. Reads the selected photos as data URIs in the browser,
//! posts them to `/api/analyze` and renders whatever comes back.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>RunAI Check</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #000;
            color: #fff;
            min-height: 100vh;
            padding: 32px 16px;
        }

        main { max-width: 896px; margin: 0 auto; }

        header { text-align: center; margin-bottom: 48px; }

        h1 {
            font-size: 2.5em;
            background: linear-gradient(90deg, #3b82f6, #9333ea);
            -webkit-background-clip: text;
            background-clip: text;
            color: transparent;
            margin-bottom: 8px;
        }

        .subtitle { color: #9ca3af; }

        .grid {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(160px, 1fr));
            gap: 16px;
            margin-bottom: 24px;
        }

        .thumb {
            aspect-ratio: 1;
            border-radius: 12px;
            overflow: hidden;
            border: 1px solid #1f2937;
        }

        .thumb img { width: 100%; height: 100%; object-fit: cover; }

        .upload-area {
            aspect-ratio: 1;
            border: 2px dashed #374151;
            border-radius: 12px;
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            cursor: pointer;
            color: #6b7280;
            transition: border-color 0.2s;
        }

        .upload-area:hover { border-color: #3b82f6; color: #3b82f6; }

        input[type="file"] { display: none; }

        button {
            width: 100%;
            padding: 14px;
            border: none;
            border-radius: 12px;
            font-size: 1.1em;
            font-weight: 600;
            color: #fff;
            background: linear-gradient(90deg, #3b82f6, #9333ea);
            cursor: pointer;
        }

        button:disabled { opacity: 0.5; cursor: not-allowed; }

        .card {
            background: #111827;
            border: 1px solid #1f2937;
            border-radius: 16px;
            padding: 24px;
            margin-top: 32px;
            display: none;
        }

        .card h2 { font-size: 1.5em; margin-bottom: 4px; }

        .chip {
            display: inline-block;
            padding: 4px 12px;
            border-radius: 999px;
            font-size: 0.85em;
            font-weight: 600;
            margin-bottom: 16px;
        }

        .progress { height: 12px; background: #1f2937; border-radius: 999px; overflow: hidden; margin: 8px 0 24px; }
        .progress-bar { height: 100%; width: 0; transition: width 0.6s; }

        .success { background: #16a34a; }
        .warning { background: #d97706; }
        .danger { background: #dc2626; }

        .analysis { color: #d1d5db; line-height: 1.6; margin-bottom: 24px; }

        .recommendation { border-top: 1px solid #1f2937; padding: 12px 0; }
        .recommendation strong { display: block; margin-bottom: 4px; }
        .recommendation span { color: #9ca3af; font-size: 0.9em; }

        .error {
            background: #450a0a;
            border: 1px solid #dc2626;
            color: #fca5a5;
            padding: 16px;
            border-radius: 12px;
            margin-top: 24px;
            display: none;
        }
    </style>
</head>
<body>
    <main>
        <header>
            <h1>RunAI Check</h1>
            <p class="subtitle">Sube fotos de la suela, costado y talón para verificar la vida útil de tus zapatillas.</p>
        </header>

        <section>
            <div class="grid" id="grid">
                <label class="upload-area" for="fileInput">
                    <div>📷</div>
                    <div>Agregar fotos</div>
                </label>
            </div>
            <input type="file" id="fileInput" accept="image/*,.heic,.heif" multiple>
            <button id="analyzeButton" disabled>Analizar desgaste</button>
        </section>

        <div class="error" id="error"></div>

        <section class="card" id="result">
            <h2 id="modelName"></h2>
            <span class="chip" id="status"></span>
            <div>Nivel de desgaste: <strong id="wearScore"></strong>%</div>
            <div class="progress"><div class="progress-bar" id="wearBar"></div></div>
            <p class="analysis" id="analysis"></p>
            <h3>Recomendaciones</h3>
            <div id="recommendations"></div>
        </section>
    </main>

    <script>
        const grid = document.getElementById('grid');
        const fileInput = document.getElementById('fileInput');
        const analyzeButton = document.getElementById('analyzeButton');
        const errorDiv = document.getElementById('error');
        const resultCard = document.getElementById('result');

        let images = [];
        let loading = false;

        function readAsDataURL(file) {
            return new Promise((resolve, reject) => {
                const reader = new FileReader();
                reader.onloadend = () => resolve(reader.result);
                reader.onerror = reject;
                reader.readAsDataURL(file);
            });
        }

        function addThumb(src) {
            const div = document.createElement('div');
            div.className = 'thumb';
            const img = document.createElement('img');
            img.src = src;
            img.alt = 'Zapatilla';
            div.appendChild(img);
            grid.insertBefore(div, grid.lastElementChild);
        }

        function refreshButton() {
            analyzeButton.disabled = loading || images.length === 0;
            analyzeButton.textContent = loading ? 'Analizando...' : 'Analizar desgaste';
        }

        fileInput.addEventListener('change', async (e) => {
            const files = Array.from(e.target.files || []);
            try {
                // Read concurrently, keep selection order.
                const newImages = await Promise.all(files.map(readAsDataURL));
                newImages.forEach(addThumb);
                images = images.concat(newImages);
            } catch (error) {
                console.error('Error reading files:', error);
            }
            fileInput.value = '';
            refreshButton();
        });

        function statusClass(score) {
            if (score < 40) return 'success';
            if (score < 70) return 'warning';
            return 'danger';
        }

        function showError(message) {
            resultCard.style.display = 'none';
            errorDiv.textContent = message;
            errorDiv.style.display = 'block';
        }

        function showResult(result) {
            errorDiv.style.display = 'none';
            const score = Number(result.wearScore) || 0;
            const cls = statusClass(score);

            document.getElementById('modelName').textContent = result.modelName || 'Desconocido';
            const status = document.getElementById('status');
            status.textContent = result.status || '';
            status.className = 'chip ' + cls;
            document.getElementById('wearScore').textContent = score;
            const bar = document.getElementById('wearBar');
            bar.className = 'progress-bar ' + cls;
            bar.style.width = Math.min(Math.max(score, 0), 100) + '%';
            document.getElementById('analysis').textContent = result.analysis || '';

            const recs = document.getElementById('recommendations');
            recs.innerHTML = '';
            (result.recommendations || []).forEach((rec) => {
                const div = document.createElement('div');
                div.className = 'recommendation';
                const name = document.createElement('strong');
                name.textContent = rec.name;
                const reason = document.createElement('span');
                reason.textContent = rec.reason;
                div.appendChild(name);
                div.appendChild(reason);
                recs.appendChild(div);
            });

            resultCard.style.display = 'block';
        }

        analyzeButton.addEventListener('click', async () => {
            if (images.length === 0 || loading) return;
            loading = true;
            refreshButton();

            try {
                const response = await fetch('/api/analyze', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ images })
                });
                const result = await response.json();
                if (result.error) {
                    showError(result.error);
                } else {
                    showResult(result);
                }
            } catch (error) {
                showError('No pudimos analizar tus zapatillas. Intenta con una imagen más clara.');
            }

            loading = false;
            refreshButton();
        });
    </script>
</body>
</html>
"#;
