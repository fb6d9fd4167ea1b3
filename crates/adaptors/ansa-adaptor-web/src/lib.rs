use ansa_core::{compose_advisory_prompt, highlight_matches, Result, SearchEngine};
use ansa_provider_inference::InferenceBackend;
use axum::extract::State as AxumState;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct SearchUiConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    /// Trimmed queries shorter than this are rejected without ranking
    pub min_query_len: usize,
}

impl Default for SearchUiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".into(),
            port: 4000,
            min_query_len: 4,
        }
    }
}

#[derive(Default)]
struct AdvisoryState {
    generation: u64,
    advice: Option<String>,
}

/// Advisory text slot guarded by a generation counter
///
/// Every accepted search bumps the generation and clears the slot. A late
/// advisory response is stored only while its generation is still current,
/// so the surface never shows advice for a superseded query.
#[derive(Default)]
pub struct AdvisorySlot {
    inner: Mutex<AdvisoryState>,
}

impl AdvisorySlot {
    /// Start a new search: bump the generation and clear stored advice
    pub fn begin(&self) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.generation += 1;
        inner.advice = None;
        inner.generation
    }

    /// Store advice if `generation` is still the current one
    ///
    /// Returns false when the advice arrived too late and was dropped.
    pub fn store(&self, generation: u64, advice: String) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.generation != generation {
            return false;
        }
        inner.advice = Some(advice);
        true
    }

    /// Current generation and whatever advice it has, if any
    pub fn snapshot(&self) -> (u64, Option<String>) {
        let inner = self.inner.lock().unwrap();
        (inner.generation, inner.advice.clone())
    }
}

#[derive(Clone)]
pub struct SearchUiServer {
    pub config: Arc<SearchUiConfig>,
    pub engine: Arc<SearchEngine>,
    pub backend: Arc<dyn InferenceBackend>,
    pub advisory: Arc<AdvisorySlot>,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub question: String,
    /// Question with query occurrences wrapped in `<mark>`
    pub question_html: String,
    pub answers: Vec<String>,
    pub score: f64,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub generation: u64,
    pub results: Vec<ResultRow>,
}

#[derive(Serialize)]
pub struct AdviceResponse {
    pub generation: u64,
    pub advice: Option<String>,
}

impl SearchUiServer {
    pub fn new(
        config: SearchUiConfig,
        engine: Arc<SearchEngine>,
        backend: Arc<dyn InferenceBackend>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            backend,
            advisory: Arc::new(AdvisorySlot::default()),
        }
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/api/search", post(search))
            .route("/api/advice", get(advice))
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(self.clone())
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Search UI listening on http://{}", addr);
        let router = self.router();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await
        });
        Ok(())
    }
}

async fn search(
    AxumState(state): AxumState<SearchUiServer>,
    Json(request): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let query = request.query.trim().to_string();
    if query.chars().count() < state.config.min_query_len {
        let (generation, _) = state.advisory.snapshot();
        return Json(SearchResponse {
            generation,
            results: Vec::new(),
        });
    }

    let generation = state.advisory.begin();

    let query_embedding = match state.backend.embed(&query).await {
        Ok(embedding) => Some(embedding),
        Err(e) => {
            warn!("Query embedding unavailable, scoring keyword-only: {}", e);
            None
        }
    };

    let results = state.engine.search(&query, query_embedding.as_deref());
    debug!("Query {:?} produced {} result(s)", query, results.len());

    if !results.is_empty() {
        let questions: Vec<String> = results.iter().map(|r| r.question.clone()).collect();
        let backend = state.backend.clone();
        let advisory = state.advisory.clone();
        let advice_query = query.clone();
        tokio::spawn(async move {
            request_advice(backend, advisory, generation, advice_query, questions).await;
        });
    }

    let rows = results
        .into_iter()
        .map(|r| ResultRow {
            question_html: highlight_matches(&r.question, &query),
            question: r.question,
            answers: r.answers,
            score: r.score,
        })
        .collect();

    Json(SearchResponse {
        generation,
        results: rows,
    })
}

async fn request_advice(
    backend: Arc<dyn InferenceBackend>,
    advisory: Arc<AdvisorySlot>,
    generation: u64,
    query: String,
    questions: Vec<String>,
) {
    let prompt = match compose_advisory_prompt(&query, &questions) {
        Ok(prompt) => prompt,
        Err(e) => {
            warn!("Advisory prompt composition failed: {}", e);
            return;
        }
    };

    match backend.advise(&prompt).await {
        Ok(advice) => {
            if !advisory.store(generation, advice) {
                debug!("Dropped stale advice for generation {}", generation);
            }
        }
        Err(e) => warn!("Advisory unavailable: {}", e),
    }
}

async fn advice(AxumState(state): AxumState<SearchUiServer>) -> Json<AdviceResponse> {
    let (generation, advice) = state.advisory.snapshot();
    Json(AdviceResponse { generation, advice })
}

async fn index(AxumState(state): AxumState<SearchUiServer>) -> Html<String> {
    let template = r##"<!doctype html><html><head><meta charset='utf-8'><title>Ansa Search</title>
    <style>
      :root { --bg:#0f172a; --panel:#111827; --accent:#22d3ee; --text:#e5e7eb; --muted:#94a3b8; --mark:#10b981; }
      body { margin:0; background: radial-gradient(1200px 600px at 10% 10%, #0b1220 0%, #0f172a 60%, #0b1020 100%); color:var(--text); font-family: Inter, system-ui, -apple-system, Segoe UI, Roboto, sans-serif; }
      .wrap { display:grid; grid-template-columns: 1fr 320px; gap:24px; padding:24px; max-width:1100px; margin:0 auto; }
      header { grid-column: 1 / -1; display:flex; align-items:center; justify-content:space-between; padding:16px 20px; background: rgba(255,255,255,0.03); border:1px solid rgba(255,255,255,0.08); border-radius:12px; }
      .brand { display:flex; align-items:center; gap:12px; font-weight:600; letter-spacing:.3px; }
      .dot { width:10px; height:10px; border-radius:50%; background:var(--mark); box-shadow:0 0 12px var(--mark); }
      .searchbox { grid-column: 1 / -1; }
      .searchbox input { width:100%; box-sizing:border-box; padding:14px 16px; border-radius:10px; border:1px solid rgba(255,255,255,0.1); background:#0b1220; color:var(--text); font-size:16px; }
      .results { background: rgba(255,255,255,0.03); border:1px solid rgba(255,255,255,0.08); border-radius:12px; padding:16px; min-height:320px; display:flex; flex-direction:column; gap:12px; }
      .card { background:#0b1220; border:1px solid rgba(255,255,255,0.08); border-radius:10px; padding:12px 14px; }
      .card .question { font-weight:600; line-height:1.4; }
      .card mark { background:rgba(16,185,129,.25); color:#6ee7b7; border-radius:3px; padding:0 2px; }
      .card details { margin-top:8px; }
      .card summary { cursor:pointer; color:var(--muted); font-size:13px; }
      .card ul { margin:8px 0 0 18px; padding:0; font-size:14px; line-height:1.5; }
      .card .score { margin-top:8px; color:var(--muted); font-size:12px; }
      .panel { background: rgba(255,255,255,0.03); border:1px solid rgba(255,255,255,0.08); border-radius:12px; padding:16px; align-self:start; }
      .panel h3 { margin:0 0 8px; font-size:14px; letter-spacing:.3px; }
      .muted { color:var(--muted); font-size:13px; }
      #advice { font-size:14px; line-height:1.5; white-space:pre-wrap; }
      @media (max-width: 980px) { .wrap { grid-template-columns: 1fr } }
    </style>
    </head>
    <body>
      <div class="wrap">
        <header>
          <div class="brand"><div class="dot"></div> Ansa Search</div>
          <div class="muted">hybrid semantic + keyword lookup</div>
        </header>
        <div class="searchbox">
          <input id="q" placeholder="Search the question bank..." autocomplete="off" />
        </div>
        <div class="results" id="results"></div>
        <aside class="panel">
          <h3>Advisory</h3>
          <div id="advice" class="muted"></div>
        </aside>
      </div>
      <script>
        const MIN_QUERY_LEN = {MIN_QUERY_LEN};
        const input = document.getElementById('q');
        const resultsDiv = document.getElementById('results');
        const adviceDiv = document.getElementById('advice');
        let adviceTimer = null;

        function escapeHtml(s) {
          return String(s).replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));
        }

        function clearAll() {
          resultsDiv.innerHTML = '';
          adviceDiv.innerText = '';
          if (adviceTimer) clearTimeout(adviceTimer);
        }

        function renderResults(results) {
          resultsDiv.innerHTML = '';
          if (!results.length) {
            resultsDiv.innerHTML = '<p class="muted">No results matched.</p>';
            adviceDiv.innerText = '';
            return;
          }
          results.forEach(r => {
            const card = document.createElement('div');
            card.className = 'card';
            const answers = r.answers.map(a => `<li>${escapeHtml(a)}</li>`).join('');
            card.innerHTML = `
              <div class="question">${r.questionHtml}</div>
              <details><summary>Answers (${r.answers.length})</summary><ul>${answers}</ul></details>
              <div class="score">score ${r.score.toFixed(3)}</div>`;
            resultsDiv.appendChild(card);
          });
        }

        function pollAdvice(generation, attempts) {
          if (adviceTimer) clearTimeout(adviceTimer);
          if (attempts <= 0) return;
          adviceTimer = setTimeout(async () => {
            try {
              const res = await fetch('/api/advice');
              const payload = await res.json();
              if (payload.generation !== generation) return;
              if (payload.advice) { adviceDiv.innerText = payload.advice; return; }
            } catch (e) {}
            pollAdvice(generation, attempts - 1);
          }, 600);
        }

        async function search(query) {
          try {
            const res = await fetch('/api/search', {
              method: 'POST',
              headers: { 'Content-Type': 'application/json' },
              body: JSON.stringify({ query })
            });
            const payload = await res.json();
            renderResults(payload.results);
            if (payload.results.length) pollAdvice(payload.generation, 20);
          } catch (e) {
            renderResults([]);
          }
        }

        input.addEventListener('input', () => {
          const q = input.value.trim();
          if (q.length < MIN_QUERY_LEN) { clearAll(); return; }
          search(q);
        });
      </script>
    </body></html>"##;

    Html(template.replace("{MIN_QUERY_LEN}", &state.config.min_query_len.to_string()))
}
