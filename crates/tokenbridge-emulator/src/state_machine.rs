//! Behavioral double of the token firmware.
//!
//! [`TokenEmulator`] speaks the same line protocol as the real device: it
//! emits the boot banner, answers `SYNC_TIME`/`PROVISION`/`RESET`, and
//! produces OTP reports on a simulated button press. Tests wire it to a mock
//! channel and drive the full bridge stack against it without hardware on
//! the bench.
//!
//! The emulator is deliberately not cryptographic. OTP codes come from a
//! small deterministic scrambler so assertions can rely on them being
//! distinct and repeatable.

/// PIN the firmware ships with before an operator changes it.
pub const DEFAULT_ADMIN_PIN: &str = "1234";

/// Seconds per TOTP step, as baked into the firmware.
pub const TIME_STEP_SECONDS: i64 = 30;

/// Simulated hardware token.
#[derive(Debug, Clone)]
pub struct TokenEmulator {
    admin_pin: String,
    user_id: Option<String>,
    secret_hex: Option<String>,
    provisioned: bool,
    eeprom_ok: bool,
    tampered: bool,
    tamper_count: u32,
    clock: Option<i64>,
    otp_serial: u32,
}

impl TokenEmulator {
    /// A factory-fresh token: unprovisioned, untampered, clock unset.
    pub fn new() -> Self {
        Self::with_admin_pin(DEFAULT_ADMIN_PIN)
    }

    pub fn with_admin_pin(pin: impl Into<String>) -> Self {
        Self {
            admin_pin: pin.into(),
            user_id: None,
            secret_hex: None,
            provisioned: false,
            eeprom_ok: true,
            tampered: false,
            tamper_count: 0,
            clock: None,
            otp_serial: 0,
        }
    }

    pub fn is_provisioned(&self) -> bool {
        self.provisioned
    }

    pub fn is_tampered(&self) -> bool {
        self.tampered
    }

    pub fn clock(&self) -> Option<i64> {
        self.clock
    }

    /// Secret the token currently holds, visible here for test assertions
    /// only; real firmware never reads it back out.
    pub fn stored_secret(&self) -> Option<&str> {
        self.secret_hex.as_deref()
    }

    /// Banner the firmware prints right after reset.
    pub fn boot_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "EEPROM:{}",
                if self.eeprom_ok { "DETECTED" } else { "MISSING" }
            ),
            format!(
                "PROVISIONED:{}",
                if self.provisioned { "YES" } else { "NO" }
            ),
        ];
        if let Some(user_id) = &self.user_id {
            lines.push(format!("USER_ID:{user_id}"));
        }
        lines.push(format!("TAMPER_COUNT:{}", self.tamper_count));
        lines.push(format!(
            "STATUS:{}",
            if self.tampered { "LOCKED" } else { "READY" }
        ));
        lines
    }

    /// Processes one host command line, returning the firmware's output.
    pub fn handle_command(&mut self, line: &str) -> Vec<String> {
        let line = line.trim();
        let (verb, argument) = match line.split_once(' ') {
            Some((verb, argument)) => (verb, argument.trim()),
            None => (line, ""),
        };

        match verb {
            "SYNC_TIME" => self.handle_sync_time(argument),
            "PROVISION" => self.handle_provision(argument),
            "RESET" => self.handle_reset(argument),
            _ => vec!["ERROR:UNKNOWN_COMMAND".to_string()],
        }
    }

    /// Emits a fresh OTP, as if the hardware button had been pressed.
    pub fn press_button(&mut self) -> Vec<String> {
        if self.tampered {
            return vec!["STATUS:LOCKED".to_string()];
        }
        if !self.provisioned {
            return vec!["ERROR:NOT_PROVISIONED".to_string()];
        }

        let mut lines = vec![format!("OTP:{}", self.next_code())];
        if let Some(clock) = self.clock {
            lines.push(format!("TIME_STEP:{}", clock / TIME_STEP_SECONDS));
        }
        lines
    }

    /// Trips the tamper sensor and locks the token.
    pub fn trigger_tamper(&mut self) -> Vec<String> {
        self.tampered = true;
        self.tamper_count += 1;
        vec![
            "TAMPER:DETECTED".to_string(),
            format!("TAMPER_COUNT:{}", self.tamper_count),
            "STATUS:TAMPERED".to_string(),
        ]
    }

    /// Periodic liveness line.
    pub fn heartbeat(&self) -> String {
        if self.tampered {
            "HEARTBEAT:LOCKED".to_string()
        } else {
            "HEARTBEAT:READY".to_string()
        }
    }

    fn handle_sync_time(&mut self, argument: &str) -> Vec<String> {
        match argument.parse::<i64>() {
            Ok(epoch) => {
                self.clock = Some(epoch);
                vec!["TIME_SYNC:SUCCESS".to_string()]
            }
            Err(_) => vec!["TIME_SYNC:FAILED".to_string()],
        }
    }

    fn handle_provision(&mut self, argument: &str) -> Vec<String> {
        if self.tampered {
            return vec!["STATUS:LOCKED".to_string()];
        }
        let Some((user_id, secret_hex)) = argument.split_once(':') else {
            return vec!["PROVISIONED:NO".to_string()];
        };
        if user_id.is_empty() || secret_hex.is_empty() {
            return vec!["PROVISIONED:NO".to_string()];
        }

        self.user_id = Some(user_id.to_string());
        self.secret_hex = Some(secret_hex.to_string());
        self.provisioned = true;
        vec![
            "PROVISIONED:YES".to_string(),
            format!("USER_ID:{user_id}"),
        ]
    }

    fn handle_reset(&mut self, pin: &str) -> Vec<String> {
        if pin == self.admin_pin {
            self.tampered = false;
            vec!["RESET:SUCCESS".to_string(), "STATUS:READY".to_string()]
        } else {
            vec!["RESET:FAILED".to_string()]
        }
    }

    // MINSTD-style scramble; distinct and repeatable, nothing more.
    fn next_code(&mut self) -> String {
        self.otp_serial = self.otp_serial.wrapping_add(1);
        let code = (u64::from(self.otp_serial) * 48_271 + 11) % 1_000_000;
        format!("{code:06}")
    }
}

impl Default for TokenEmulator {
    fn default() -> Self {
        Self::new()
    }
}
