use async_trait::async_trait;
use buildah_build::Orchestrator;
use buildah_client::{Buildah, CommandOutput, CommandRunner, StorageProbe};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const CONTAINER_ID: &str = "scratch-working-container";

#[derive(Debug, Clone)]
pub struct Invocation {
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    pub fn subcommand(&self) -> &str {
        &self.args[0]
    }
}

/// Stands in for the buildah binary and records every invocation.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    calls: Arc<Mutex<Vec<Invocation>>>,
    fail_on: Option<String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit with status 1 when `subcommand` is run.
    pub fn failing_on(subcommand: &str) -> Self {
        Self {
            fail_on: Some(subcommand.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn subcommands(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.subcommand().to_string())
            .collect()
    }

    pub fn call(&self, subcommand: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .find(|c| c.subcommand() == subcommand)
            .map(|c| c.args)
            .unwrap_or_else(|| panic!("no {} invocation", subcommand))
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        _program: &Path,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> std::io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(Invocation {
            args: args.to_vec(),
            env: env.clone(),
        });

        let subcommand = args[0].as_str();
        if self.fail_on.as_deref() == Some(subcommand) {
            return Ok(CommandOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: format!("Error: {} failed\n", subcommand),
            });
        }

        let stdout = match subcommand {
            "version" => "Version:         1.33.7\nGo Version:      go1.22.5\n".to_string(),
            "from" => format!("{}\n", CONTAINER_ID),
            _ => String::new(),
        };

        Ok(CommandOutput {
            exit_code: 0,
            stdout,
            stderr: String::new(),
        })
    }
}

/// A probe that never finds the overlay helper.
pub fn empty_probe() -> StorageProbe {
    StorageProbe::new()
        .with_search_path("/nonexistent-buildah-build-test-bin")
        .with_storage_conf_candidates(vec![])
}

pub fn orchestrator(runner: &ScriptedRunner, probe: StorageProbe) -> Orchestrator<ScriptedRunner> {
    Orchestrator::new(Buildah::new("/usr/bin/buildah", runner.clone()), probe)
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
