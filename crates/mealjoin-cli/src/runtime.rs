// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use mealjoin_app::DataSupplier;
use mealjoin_store::MockStore;
use std::sync::Arc;
use std::time::Duration;
use time::{Date, OffsetDateTime};

/// Wires the demo store into the terminal front-end.
pub struct StoreRuntime {
    store: Arc<MockStore>,
    toast: Duration,
}

impl StoreRuntime {
    pub fn new(store: Arc<MockStore>, toast: Duration) -> Self {
        Self { store, toast }
    }
}

impl mealjoin_tui::AppRuntime for StoreRuntime {
    fn supplier(&self) -> Arc<dyn DataSupplier> {
        self.store.clone()
    }

    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }

    fn toast_duration(&self) -> Duration {
        self.toast
    }
}
