//! Realm lifecycle commands.

use kc_provider::{ReadOutcome, RealmController};

use crate::cli::{ApplyArgs, DestroyArgs, ImportArgs, PlanArgs, StateArgs};
use crate::config::OutputFormat;
use crate::output::{confirm, notice, output_plan, output_single, warning};

use super::state::{load_document, load_state, load_tracked, remove_state, save_state};

/// Prints what apply would do.
pub fn plan(controller: &RealmController, args: &PlanArgs, format: OutputFormat) -> crate::CliResult<()> {
    let config = load_document(&args.config)?;
    let prior = match &args.state {
        Some(path) => load_state(path)?,
        None => None,
    };

    let plan = controller.plan(prior.as_ref(), &config)?;
    output_plan(&plan, format)
}

/// Applies the configuration and records the resulting state.
pub async fn apply(
    controller: &RealmController,
    args: &ApplyArgs,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let config = load_document(&args.config)?;
    let prior = load_state(&args.state)?;

    let plan = controller.plan(prior.as_ref(), &config)?;
    output_plan(&plan, format)?;
    if !plan.has_changes() {
        return Ok(());
    }

    let state = match controller.apply(prior.as_ref(), &config).await {
        Ok(state) => state,
        Err(e) => {
            if let Some(id) = e.created_id() {
                let mut tracked = config.clone();
                tracked.set_id(id);
                save_state(&args.state, &tracked)?;
                warning(&format!(
                    "Realm '{id}' was created but could not be read back; run refresh"
                ));
            }
            return Err(e.into());
        }
    };
    save_state(&args.state, &state)?;
    notice(
        &format!(
            "Realm '{}' applied (id {})",
            state.get_str("realm").unwrap_or_default(),
            state.id().unwrap_or_default()
        ),
        format,
    );
    Ok(())
}

/// Re-reads the tracked realm, dropping the state if it's gone.
pub async fn refresh(
    controller: &RealmController,
    args: &StateArgs,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let (id, prior) = load_tracked(&args.state)?;

    match controller.read(&id, &prior).await? {
        ReadOutcome::Present(state) => {
            save_state(&args.state, &state)?;
            output_single(&state, format)
        }
        ReadOutcome::Absent => {
            remove_state(&args.state)?;
            warning(&format!("Realm '{id}' no longer exists; state removed"));
            Ok(())
        }
    }
}

/// Starts tracking an existing realm.
pub async fn import(
    controller: &RealmController,
    args: &ImportArgs,
    format: OutputFormat,
) -> crate::CliResult<()> {
    if let Some(existing) = load_state(&args.state)? {
        return Err(crate::CliError::InvalidArgument(format!(
            "{} already tracks realm '{}'",
            args.state.display(),
            existing.id().unwrap_or_default()
        )));
    }

    let state = controller.import(&args.id).await?;
    save_state(&args.state, &state)?;
    output_single(&state, format)?;
    notice(&format!("Realm '{}' imported", args.id), format);
    Ok(())
}

/// Deletes the tracked realm and its state file.
pub async fn destroy(
    controller: &RealmController,
    args: &DestroyArgs,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let (id, state) = load_tracked(&args.state)?;
    let name = state.get_str("realm").unwrap_or(&id).to_string();

    if !args.force && !confirm(&format!("Are you sure you want to delete realm '{name}'?"))? {
        return Err(crate::CliError::Cancelled);
    }

    controller.delete(&id).await?;
    remove_state(&args.state)?;
    notice(&format!("Realm '{name}' deleted"), format);
    Ok(())
}
