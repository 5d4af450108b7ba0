//! Shared test utilities for integration tests
//!
//! A dispatcher wired to fixtures and scripted input, and serialized access to the
//! `SL_*` environment variables the config loader reads.

use slcli::cli::{Dispatcher, ScriptedPrompter};
use slcli::commands::registry;
use slcli::formatting::OutputFormat;
use slcli::tooling::CannedEditor;
use slcli::transport::FixtureTransport;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Mutex;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Variables the config loader reads
const SL_VARS: [&str; 4] = ["SL_USERNAME", "SL_API_KEY", "SL_ENDPOINT_URL", "SL_TIMEOUT"];

/// Run `f` with exactly `vars` set among the `SL_*` variables; restores afterwards.
pub fn with_sl_env<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> =
        SL_VARS.iter().map(|name| (*name, std::env::var(name).ok())).collect();

    for name in SL_VARS {
        std::env::remove_var(name);
    }
    for (name, value) in vars {
        std::env::set_var(name, value);
    }

    let result = f();

    for (name, value) in saved {
        match value {
            Some(value) => std::env::set_var(name, value),
            None => std::env::remove_var(name),
        }
    }
    result
}

/// A dispatcher over the real registry with every outside effect replaced.
pub struct Harness {
    pub dispatcher: Dispatcher,
    pub transport: Rc<FixtureTransport>,
    /// Times the client factory ran
    pub factory_calls: Rc<Cell<usize>>,
    pub prompts: Rc<RefCell<Vec<String>>>,
}

impl Harness {
    pub fn new(answers: &[&str]) -> Self {
        Self::with_transport(FixtureTransport::demo(), answers)
    }

    pub fn with_transport(transport: FixtureTransport, answers: &[&str]) -> Self {
        let transport = Rc::new(transport);
        let factory_calls = Rc::new(Cell::new(0));
        let prompter = ScriptedPrompter::new(answers.iter().copied());
        let prompts = prompter.transcript();

        let shared = Rc::clone(&transport);
        let counter = Rc::clone(&factory_calls);
        let dispatcher = Dispatcher::new(registry())
            .with_client_factory(move |_, _| {
                counter.set(counter.get() + 1);
                Ok(Box::new(Rc::clone(&shared)))
            })
            .with_prompter(prompter)
            .with_editor(CannedEditor::new("Edited body"))
            .with_user_config(None)
            .with_default_format(OutputFormat::Raw);

        Self {
            dispatcher,
            transport,
            factory_calls,
            prompts,
        }
    }

    /// Methods called so far, as `Service::method`.
    pub fn called(&self) -> Vec<String> {
        self.transport
            .calls()
            .into_iter()
            .map(|c| format!("{}::{}", c.service, c.method))
            .collect()
    }
}
