//! Set command - send an outlet command and confirm the result

use std::time::Duration;

use anyhow::{Context, Result};
use cyberpower_pdu::{OutletCommand, PduBackend};

use crate::output::{on_off, OutletRow, OutputContext};

/// Send `command` to `outlet`, wait, then re-read the outlet.
///
/// The device does not acknowledge completion, so the re-read after `wait`
/// is the only confirmation available.
pub async fn set(
    pdu: &dyn PduBackend,
    outlet: i64,
    command: OutletCommand,
    wait: Duration,
    ctx: &OutputContext,
) -> Result<()> {
    let before = pdu
        .get_outlet_state(outlet)
        .await
        .with_context(|| format!("Command failed: reading outlet {}", outlet))?;
    ctx.info(&format!("Outlet {} state: {}", outlet, on_off(before)));

    ctx.info(&format!("Setting outlet {} to {}", outlet, command));
    pdu.send_outlet_command(outlet, command)
        .await
        .with_context(|| format!("Command failed: {} outlet {}", command, outlet))?;

    if !wait.is_zero() {
        ctx.info(&format!("Waiting for {:.1} seconds ...", wait.as_secs_f64()));
        tokio::time::sleep(wait).await;
    }

    let after = pdu
        .get_outlet_state(outlet)
        .await
        .with_context(|| format!("Command failed: reading outlet {}", outlet))?;

    if after == command.settled_state() {
        ctx.success(&format!("Outlet {} is {}", outlet, on_off(after)));
    } else {
        ctx.error(&format!(
            "Outlet {} is still {} (expected {})",
            outlet,
            on_off(after),
            on_off(command.settled_state())
        ));
    }

    ctx.print_one(&OutletRow {
        outlet,
        state: on_off(after),
    });
    Ok(())
}
