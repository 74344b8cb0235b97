//! Drives an emulated token over a mock serial channel.
//!
//! Integration tests attach a [`TokenEmulator`] to the device side of a
//! [`MockChannelHandle`] and pump exchanges explicitly: await what the
//! bridge wrote, let the emulator answer, push the reply lines back.

use tokenbridge_device::{ChannelResult, MockChannelHandle};

use crate::state_machine::TokenEmulator;

impl TokenEmulator {
    /// Emits the boot banner into the channel, as the firmware does after
    /// the port-open reset.
    pub async fn announce_boot(&self, link: &MockChannelHandle) -> ChannelResult<()> {
        emit_report(link, self.boot_lines()).await
    }

    /// Waits for the next command from the bridge, answers it, and returns
    /// the command line. `None` once the bridge side has gone away.
    pub async fn serve_next(
        &mut self,
        link: &mut MockChannelHandle,
    ) -> ChannelResult<Option<String>> {
        let Some(command) = link.next_written().await else {
            return Ok(None);
        };
        emit_report(link, self.handle_command(&command)).await?;
        Ok(Some(command))
    }
}

/// Pushes a batch of report lines into the channel.
pub async fn emit_report(link: &MockChannelHandle, lines: Vec<String>) -> ChannelResult<()> {
    for line in lines {
        link.push_line(line).await?;
    }
    Ok(())
}
