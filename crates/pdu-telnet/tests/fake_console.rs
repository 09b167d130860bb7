//! TelnetPdu against a loopback TCP console emulating the PDU

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pdu_core::{OutletCommand, PduBackend, PduError};
use pdu_telnet::{TelnetConfig, TelnetPdu};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

const PROMPT: &str = "\r\nCyberPower > ";

/// Strip 3-byte option replies (IAC verb option) the client sends back
fn clean(line: &[u8]) -> String {
    let mut out = Vec::new();
    let mut i = 0;
    while i < line.len() {
        if line[i] == 0xFF {
            i += 3;
            continue;
        }
        out.push(line[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).trim().to_string()
}

fn status_page(outlets: &[bool]) -> String {
    let mut page = String::from("\r\n  Index    Name          Status\r\n");
    for (i, on) in outlets.iter().enumerate() {
        page.push_str(&format!(
            "  {}        Outlet{}       {}\r\n",
            i + 1,
            i + 1,
            if *on { "On" } else { "Off" }
        ));
    }
    page
}

async fn serve(stream: TcpStream, outlets: Arc<Mutex<Vec<bool>>>) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = Vec::new();

    // WILL ECHO, WILL SUPPRESS-GO-AHEAD
    write_half.write_all(&[0xFF, 0xFB, 0x01, 0xFF, 0xFB, 0x03]).await?;
    write_half.write_all(b"\r\nLogin Name: ").await?;
    reader.read_until(b'\n', &mut line).await?;
    let user = clean(&line);
    line.clear();

    write_half.write_all(b"Login Password: ").await?;
    reader.read_until(b'\n', &mut line).await?;
    let password = clean(&line);
    line.clear();

    if user != "cyber" || password != "cyber" {
        write_half.write_all(b"\r\nLogin Name: ").await?;
        return Ok(());
    }
    write_half.write_all(PROMPT.as_bytes()).await?;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            return Ok(());
        }
        let command = clean(&line);
        if command == "exit" {
            write_half.write_all(b"\r\nBye\r\n").await?;
            return Ok(());
        }
        let words: Vec<&str> = command.split_whitespace().collect();
        let reply = match words.as_slice() {
            ["oltsta", "show"] => {
                let outlets = outlets.lock();
                status_page(&outlets)
            }
            ["oltctrl", "index", n, "act", action] => {
                let index: usize = n.parse().unwrap_or(0);
                let mut outlets = outlets.lock();
                match (outlets.get_mut(index.wrapping_sub(1)), *action) {
                    (Some(state), "on" | "reboot") => *state = true,
                    (Some(state), "off") => *state = false,
                    _ => {}
                }
                format!("\r\nOutlet{} {}\r\n", index, action)
            }
            _ => "\r\nUnknown command\r\n".to_string(),
        };
        write_half.write_all(format!("{}{}", reply, PROMPT).as_bytes()).await?;
    }
}

async fn spawn_console(outlets: usize) -> (u16, Arc<Mutex<Vec<bool>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(Mutex::new(vec![false; outlets]));
    let shared = state.clone();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let _ = serve(stream, shared.clone()).await;
        }
    });

    (port, state)
}

fn config(port: u16) -> TelnetConfig {
    let mut config = TelnetConfig::new("127.0.0.1");
    config.port = port;
    config
}

#[tokio::test]
async fn test_full_session_over_tcp() {
    let (port, state) = spawn_console(8).await;
    let mut pdu = TelnetPdu::new(config(port));

    pdu.initialize().await.unwrap();
    assert_eq!(pdu.outlet_count(), Ok(8));

    pdu.send_outlet_command(3, OutletCommand::TurnOn).await.unwrap();
    assert_eq!(pdu.get_outlet_state(3).await, Ok(true));
    assert!(state.lock()[2]);

    pdu.send_outlet_command(3, OutletCommand::TurnOff).await.unwrap();
    pdu.send_outlet_command(8, OutletCommand::Reboot).await.unwrap();
    let states = pdu.get_all_outlet_states().await.unwrap();
    assert_eq!(states, vec![false, false, false, false, false, false, false, true]);

    pdu.close().await.unwrap();
}

#[tokio::test]
async fn test_repeated_command_is_idempotent() {
    let (port, _) = spawn_console(4).await;
    let mut pdu = TelnetPdu::new(config(port));
    pdu.initialize().await.unwrap();

    for _ in 0..2 {
        pdu.send_outlet_command(2, OutletCommand::TurnOn).await.unwrap();
        assert_eq!(pdu.get_outlet_state(2).await, Ok(true));
    }
    pdu.close().await.unwrap();
}

#[tokio::test]
async fn test_wrong_password() {
    let (port, _) = spawn_console(4).await;
    let mut pdu = TelnetPdu::new(config(port).with_credentials("cyber", "nope"));

    assert!(matches!(pdu.initialize().await, Err(PduError::Connection(_))));
}

#[tokio::test]
async fn test_refused_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mut config = config(port);
    config.connect_timeout_ms = 1000;
    let mut pdu = TelnetPdu::new(config);

    let result = tokio::time::timeout(Duration::from_secs(5), pdu.initialize())
        .await
        .expect("connect attempt should finish");
    assert!(matches!(result, Err(PduError::Connection(_))));
}
