//! Shared test utilities used across shatter crates.

pub mod tracing {
    //! In-memory capture of spans and events for instrumentation assertions.
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex, PoisonError};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::{Layer, Registry};

    /// Layer that keeps every closed span and every event it observes.
    ///
    /// Clones share storage, so a test can hand one clone to a subscriber
    /// and inspect another afterwards.
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        spans: Arc<Mutex<Vec<SpanRecord>>>,
        events: Arc<Mutex<Vec<EventRecord>>>,
    }

    impl RecordingLayer {
        /// Runs `f` with a fresh layer installed as the thread's default
        /// subscriber and returns its output alongside the layer.
        ///
        /// # Examples
        /// ```
        /// use shatter_test_support::tracing::RecordingLayer;
        ///
        /// let (value, layer) = RecordingLayer::capture(|| {
        ///     let _span = tracing::info_span!("core.demo").entered();
        ///     7
        /// });
        /// assert_eq!(value, 7);
        /// assert!(layer.span("core.demo").is_some());
        /// ```
        pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Self) {
            let layer = Self::default();
            let subscriber = Registry::default().with(layer.clone());
            let output = tracing::subscriber::with_default(subscriber, f);
            (output, layer)
        }

        /// Closed spans in completion order.
        ///
        /// # Examples
        /// ```
        /// use shatter_test_support::tracing::RecordingLayer;
        ///
        /// let layer = RecordingLayer::default();
        /// assert!(layer.spans().is_empty());
        /// ```
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.spans.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }

        /// Events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }

        /// First closed span called `name`.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<SpanRecord> {
            self.spans().into_iter().find(|span| span.name == name)
        }

        /// Number of closed spans called `name`.
        #[must_use]
        pub fn span_count(&self, name: &str) -> usize {
            self.spans().iter().filter(|span| span.name == name).count()
        }

        /// Events whose `message` field equals `message`.
        #[must_use]
        pub fn events_with_message(&self, message: &str) -> Vec<EventRecord> {
            self.events()
                .into_iter()
                .filter(|event| event.message() == Some(message))
                .collect()
        }
    }

    /// Closed span with the fields recorded on it.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name from the metadata.
        pub name: String,
        /// Fields recorded at creation or later.
        pub fields: HashMap<String, String>,
    }

    impl SpanRecord {
        /// Rendered value of `field`, if recorded.
        #[must_use]
        pub fn field(&self, field: &str) -> Option<&str> {
            self.fields.get(field).map(String::as_str)
        }
    }

    /// Emitted event with its level, target and fields.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Event target.
        pub target: String,
        /// Structured fields, including `message`.
        pub fields: HashMap<String, String>,
    }

    impl EventRecord {
        /// Rendered value of `field`, if recorded.
        #[must_use]
        pub fn field(&self, field: &str) -> Option<&str> {
            self.fields.get(field).map(String::as_str)
        }

        /// The event's message.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.field("message")
        }
    }

    struct OpenSpan {
        name: String,
        fields: HashMap<String, String>,
    }

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut fields = HashMap::new();
            attrs.record(&mut FieldCollector(&mut fields));
            span.extensions_mut().insert(OpenSpan {
                name: attrs.metadata().name().to_owned(),
                fields,
            });
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            if let Some(open) = span.extensions_mut().get_mut::<OpenSpan>() {
                values.record(&mut FieldCollector(&mut open.fields));
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            let Some(open) = span.extensions_mut().remove::<OpenSpan>() else {
                return;
            };
            self.spans
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(SpanRecord {
                    name: open.name,
                    fields: open.fields,
                });
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = HashMap::new();
            event.record(&mut FieldCollector(&mut fields));
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(EventRecord {
                    level: *event.metadata().level(),
                    target: event.metadata().target().to_owned(),
                    fields,
                });
        }
    }

    struct FieldCollector<'a>(&'a mut HashMap<String, String>);

    impl FieldCollector<'_> {
        fn put(&mut self, field: &Field, value: String) {
            self.0.insert(field.name().to_owned(), value);
        }
    }

    impl Visit for FieldCollector<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.put(field, format!("{value:?}"));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.put(field, value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.put(field, value.to_string());
        }

        fn record_bool(&mut self, field: &Field, value: bool) {
            self.put(field, value.to_string());
        }

        fn record_i64(&mut self, field: &Field, value: i64) {
            self.put(field, value.to_string());
        }

        fn record_u64(&mut self, field: &Field, value: u64) {
            self.put(field, value.to_string());
        }

        fn record_f64(&mut self, field: &Field, value: f64) {
            self.put(field, value.to_string());
        }
    }
}

pub mod ci;

pub mod fixtures {
    //! Labelled edge lists for common graph shapes.
    //!
    //! Vertices are labelled with decimal indices. Every list is ordered so
    //! that vertex `i` first appears before vertex `i + 1`, which keeps
    //! positional indices equal to the labels once a graph is built from it.

    /// A labelled directed edge.
    pub type Edge = (String, String);

    fn edge(source: usize, target: usize) -> Edge {
        (source.to_string(), target.to_string())
    }

    /// Directed path `0 -> 1 -> ... -> n-1`.
    ///
    /// # Examples
    /// ```
    /// use shatter_test_support::fixtures::path_edges;
    ///
    /// assert_eq!(path_edges(3), vec![("0".into(), "1".into()), ("1".into(), "2".into())]);
    /// ```
    #[must_use]
    pub fn path_edges(vertices: usize) -> Vec<Edge> {
        (1..vertices).map(|target| edge(target - 1, target)).collect()
    }

    /// Directed cycle `0 -> 1 -> ... -> n-1 -> 0`.
    #[must_use]
    pub fn cycle_edges(vertices: usize) -> Vec<Edge> {
        (0..vertices)
            .map(|source| edge(source, (source + 1) % vertices))
            .collect()
    }

    /// Hub `0` pointing at leaves `1..=leaves`.
    #[must_use]
    pub fn star_edges(leaves: usize) -> Vec<Edge> {
        (1..=leaves).map(|leaf| edge(0, leaf)).collect()
    }

    /// Both directions between every pair of `vertices` vertices.
    #[must_use]
    pub fn complete_edges(vertices: usize) -> Vec<Edge> {
        clique(0, vertices)
    }

    /// Disjoint complete graphs of the given sizes, numbered consecutively.
    ///
    /// # Examples
    /// ```
    /// use shatter_test_support::fixtures::clique_union_edges;
    ///
    /// // Two pairs and a triangle: 2 + 2 + 6 directed edges.
    /// assert_eq!(clique_union_edges(&[2, 2, 3]).len(), 10);
    /// ```
    #[must_use]
    pub fn clique_union_edges(sizes: &[usize]) -> Vec<Edge> {
        let mut offset = 0;
        let mut edges = Vec::new();
        for &size in sizes {
            edges.extend(clique(offset, size));
            offset += size;
        }
        edges
    }

    fn clique(offset: usize, size: usize) -> Vec<Edge> {
        let members = offset..offset + size;
        members
            .clone()
            .flat_map(|source| {
                members
                    .clone()
                    .filter(move |target| *target != source)
                    .map(move |target| edge(source, target))
            })
            .collect()
    }

    /// Renders edges as a crawl CSV with a `source,target` header.
    ///
    /// # Examples
    /// ```
    /// use shatter_test_support::fixtures::{crawl_csv, path_edges};
    ///
    /// assert_eq!(crawl_csv(&path_edges(2)), "source,target\n0,1\n");
    /// ```
    #[must_use]
    pub fn crawl_csv(edges: &[Edge]) -> String {
        let mut csv = String::from("source,target\n");
        for (source, target) in edges {
            csv.push_str(source);
            csv.push(',');
            csv.push_str(target);
            csv.push('\n');
        }
        csv
    }
}
