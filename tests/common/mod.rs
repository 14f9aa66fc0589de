#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use rs_ful488::{TalkChunk, Transport};

/// A primitive as seen by the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Ren(bool),
    Ifc,
    Atn(u8),
    Srq,
    Status,
    Talk(TalkChunk),
    Listen(usize),
}

#[derive(Default)]
pub struct BridgeState {
    calls: Vec<Call>,
    statuses: VecDeque<u8>,
    listen_data: VecDeque<Vec<u8>>,
    failing_atn: Option<u8>,
    failing_ren: bool,
    failing_listen: bool,
    srq: bool,
}

/// Recording bridge. Clones share the same state, so a test keeps one clone
/// to inspect what the controller did with the other.
#[derive(Clone, Default)]
pub struct MockBridge(Arc<Mutex<BridgeState>>);

impl MockBridge {
    pub fn new() -> MockBridge {
        let _ = env_logger::builder().is_test(true).try_init();
        MockBridge::default()
    }

    /// Status register values returned in order, zero once exhausted
    pub fn push_status(&self, status: u8) {
        self.0.lock().unwrap().statuses.push_back(status);
    }

    /// Listen chunks returned in order, empty once exhausted
    pub fn push_listen(&self, data: Vec<u8>) {
        self.0.lock().unwrap().listen_data.push_back(data);
    }

    /// Make every ATN write of `command` fail
    pub fn fail_atn(&self, command: u8) {
        self.0.lock().unwrap().failing_atn = Some(command);
    }

    pub fn fail_ren(&self) {
        self.0.lock().unwrap().failing_ren = true;
    }

    /// Make every listen read fail
    pub fn fail_listen(&self) {
        self.0.lock().unwrap().failing_listen = true;
    }

    pub fn set_srq(&self, srq: bool) {
        self.0.lock().unwrap().srq = srq;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().calls.clone()
    }

    /// Only the command bytes sent under ATN
    pub fn atn(&self) -> Vec<u8> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Atn(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    /// Only the talk chunks
    pub fn talked(&self) -> Vec<TalkChunk> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Talk(chunk) => Some(chunk),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.0.lock().unwrap().calls.push(call);
    }
}

impl Transport for MockBridge {
    fn set_remote_enable(&mut self, enable: bool) -> Result<()> {
        self.record(Call::Ren(enable));
        if self.0.lock().unwrap().failing_ren {
            return Err(anyhow!("REN request stalled"));
        }
        Ok(())
    }

    fn pulse_interface_clear(&mut self) -> Result<()> {
        self.record(Call::Ifc);
        Ok(())
    }

    fn send_atn_command(&mut self, command: u8) -> Result<()> {
        self.record(Call::Atn(command));
        if self.0.lock().unwrap().failing_atn == Some(command) {
            return Err(anyhow!("ATN request {:#04x} stalled", command));
        }
        Ok(())
    }

    fn read_service_request_line(&mut self) -> Result<bool> {
        self.record(Call::Srq);
        Ok(self.0.lock().unwrap().srq)
    }

    fn read_status_register(&mut self) -> Result<u8> {
        self.record(Call::Status);
        Ok(self.0.lock().unwrap().statuses.pop_front().unwrap_or(0))
    }

    fn write_talk_chunk(&mut self, chunk: TalkChunk) -> Result<()> {
        self.record(Call::Talk(chunk));
        Ok(())
    }

    fn read_listen_chunk(&mut self, max_len: usize) -> Result<Vec<u8>> {
        self.record(Call::Listen(max_len));
        if self.0.lock().unwrap().failing_listen {
            return Err(anyhow!("LISTEN request timed out"));
        }
        let mut data = self
            .0
            .lock()
            .unwrap()
            .listen_data
            .pop_front()
            .unwrap_or_default();
        data.truncate(max_len);
        Ok(data)
    }
}
