//! Load command - read bank current draw

use anyhow::{Context, Result};
use cyberpower_pdu::PduBackend;

use crate::output::{BankRow, OutputContext};

/// Read one bank, or every bank when none is given
pub async fn load(pdu: &dyn PduBackend, bank: Option<i64>, ctx: &OutputContext) -> Result<()> {
    let banks: Vec<i64> = match bank {
        Some(bank) => vec![bank],
        None => {
            let count = pdu.bank_count().context("Command failed: reading bank count")?;
            (1..=i64::from(count)).collect()
        }
    };

    let mut rows = Vec::with_capacity(banks.len());
    for bank in banks {
        let load = pdu
            .get_bank_load(bank)
            .await
            .with_context(|| format!("Command failed: reading load of bank {}", bank))?;
        rows.push(BankRow { bank, load });
    }

    if bank.is_some() {
        if let Some(row) = rows.first() {
            ctx.print_one(row);
        }
    } else {
        ctx.print(&rows);
    }
    Ok(())
}
