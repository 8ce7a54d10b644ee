#![allow(dead_code)]

pub mod fakes {
    use isoview::client::{Document, ErrorSink, History};
    use isoview::error::ViewError;
    use isoview::view::{TemplateViews, ViewRenderer};
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Records every container write.
    #[derive(Default)]
    pub struct RecordingDocument {
        writes: Mutex<Vec<(String, String)>>,
    }

    impl RecordingDocument {
        pub fn writes(&self) -> Vec<(String, String)> {
            self.writes.lock().clone()
        }

        pub fn last_html(&self) -> Option<String> {
            self.writes.lock().last().map(|(_, html)| html.clone())
        }
    }

    impl Document for RecordingDocument {
        fn set_inner_html(&self, element_id: &str, html: &str) {
            self.writes
                .lock()
                .push((element_id.to_string(), html.to_string()));
        }
    }

    /// Records every alert message.
    #[derive(Default)]
    pub struct RecordingAlerts {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingAlerts {
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().clone()
        }
    }

    impl ErrorSink for RecordingAlerts {
        fn alert(&self, message: &str) {
            self.messages.lock().push(message.to_string());
        }
    }

    /// In-memory history stack.
    pub struct FakeHistory {
        entries: Mutex<Vec<String>>,
    }

    impl FakeHistory {
        pub fn at(path: &str) -> Self {
            Self {
                entries: Mutex::new(vec![path.to_string()]),
            }
        }

        pub fn entries(&self) -> Vec<String> {
            self.entries.lock().clone()
        }
    }

    impl History for FakeHistory {
        fn current_path(&self) -> String {
            self.entries.lock().last().cloned().unwrap_or_default()
        }

        fn push_state(&self, path: &str) {
            self.entries.lock().push(path.to_string());
        }
    }

    /// Renderer that counts calls and keeps the data it was given before
    /// delegating to templates.
    pub struct CountingViews {
        inner: TemplateViews,
        calls: AtomicUsize,
        rendered: Mutex<Vec<(String, Value)>>,
    }

    impl CountingViews {
        pub fn new(inner: TemplateViews) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
                rendered: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// `(view, data)` of the most recent render.
        pub fn last_render(&self) -> Option<(String, Value)> {
            self.rendered.lock().last().cloned()
        }
    }

    impl ViewRenderer for CountingViews {
        fn render(&self, view: &str, data: &Value) -> Result<String, ViewError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rendered.lock().push((view.to_string(), data.clone()));
            self.inner.render(view, data)
        }

        fn render_layout(&self, body: &str) -> Result<String, ViewError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.render_layout(body)
        }
    }

    pub fn widget_views() -> TemplateViews {
        TemplateViews::from_sources([
            ("widgets/show", "<div>{{ id }}</div>"),
            ("home", "<h1>home</h1>"),
            ("empty", "<p>empty</p>"),
            ("layout", "<html><body>{{ body }}</body></html>"),
        ])
        .unwrap()
    }

    pub fn shared<T>(value: T) -> Arc<T> {
        Arc::new(value)
    }
}

pub mod test_server {
    use std::sync::Once;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }
}
