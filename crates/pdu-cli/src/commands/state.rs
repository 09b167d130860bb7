//! State commands - read outlet states

use anyhow::{Context, Result};
use cyberpower_pdu::PduBackend;

use crate::output::{on_off, OutletRow, OutputContext};

/// Read a single outlet
pub async fn state(pdu: &dyn PduBackend, outlet: i64, ctx: &OutputContext) -> Result<()> {
    let on = pdu
        .get_outlet_state(outlet)
        .await
        .with_context(|| format!("Command failed: reading outlet {}", outlet))?;

    ctx.print_one(&OutletRow {
        outlet,
        state: on_off(on),
    });
    Ok(())
}

/// Read every outlet
pub async fn states(pdu: &dyn PduBackend, ctx: &OutputContext) -> Result<()> {
    let states = pdu
        .get_all_outlet_states()
        .await
        .context("Command failed: reading outlet states")?;

    let rows: Vec<OutletRow> = states
        .into_iter()
        .enumerate()
        .map(|(k, on)| OutletRow {
            outlet: k as i64 + 1,
            state: on_off(on),
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}
