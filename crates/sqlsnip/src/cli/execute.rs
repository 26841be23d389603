//! Command execution logic.

use anyhow::{Context, Result, bail};
use tokio::io::AsyncReadExt;

use super::args::RunArgs;
use crate::config::SessionConfig;
use crate::output::{OutputConfig, OutputMode, print_outcome};
use crate::scanner::IdentifierCase;
use crate::session::Session;

/// Execute the run command
pub async fn execute_run(args: &RunArgs, output_mode: OutputMode) -> Result<()> {
    let config = load_config(args).await?;
    let script = read_script(args).await?;

    tracing::debug!(
        script = %args.script.display(),
        identifier_case = ?config.identifier_case,
        fail_fast = config.fail_fast,
        "Running session script"
    );

    let session = Session::new(config);
    let outcomes = session.run_script(&script).await;

    let output_config = OutputConfig::from_env();
    for outcome in &outcomes {
        print_outcome(outcome, output_mode, &output_config)?;
    }

    let failed = outcomes.iter().filter(|outcome| outcome.is_error()).count();
    if failed > 0 {
        bail!("{failed} of {} cells failed", outcomes.len());
    }

    Ok(())
}

/// Resolve configuration: explicit file, then discovered file, then flags.
async fn load_config(args: &RunArgs) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .await
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => SessionConfig::discover(&std::env::current_dir()?).await?,
    };

    if args.fail_fast {
        config.fail_fast = true;
    }
    if args.case_insensitive {
        config.identifier_case = IdentifierCase::Insensitive;
    }

    Ok(config)
}

async fn read_script(args: &RunArgs) -> Result<String> {
    if args.reads_stdin() {
        let mut script = String::new();
        tokio::io::stdin()
            .read_to_string(&mut script)
            .await
            .context("Failed to read script from stdin")?;
        Ok(script)
    } else {
        tokio::fs::read_to_string(&args.script)
            .await
            .with_context(|| format!("Failed to read script {}", args.script.display()))
    }
}
