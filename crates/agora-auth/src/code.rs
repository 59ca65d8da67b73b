//! Six-slot entry for the login code.

use agora_models::{OTP_LENGTH, OtpCode};

/// What a single edit did to the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeEvent {
    /// Input refused; the slots are unchanged.
    Rejected,
    /// Slots or focus changed but there is nothing to submit yet.
    Updated,
    /// The edit completed the code; verification should start.
    Complete(OtpCode),
}

/// Collects a one-time code digit by digit or from a paste.
///
/// Auto-submit fires when an entry leaves all slots populated and either
/// fills the last slot or completes a code that was incomplete before the
/// entry. Re-typing a middle digit of an already complete code does not
/// fire again.
#[derive(Debug, Clone, Default)]
pub struct CodeCollector {
    slots: [Option<char>; OTP_LENGTH],
    focus: usize,
}

impl CodeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Option<char>; OTP_LENGTH] {
        &self.slots
    }

    /// Index of the slot that receives the next keystroke.
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The entered digits, `-` for empty slots.
    pub fn display(&self) -> String {
        self.slots.iter().map(|slot| slot.unwrap_or('-')).collect()
    }

    /// The code, if every slot is filled.
    pub fn code(&self) -> Option<OtpCode> {
        let mut digits = ['0'; OTP_LENGTH];
        for (digit, slot) in digits.iter_mut().zip(self.slots.iter()) {
            *digit = (*slot)?;
        }
        OtpCode::from_digits(digits).ok()
    }

    /// Types `ch` into slot `index`.
    pub fn input(&mut self, index: usize, ch: char) -> CodeEvent {
        if index >= OTP_LENGTH || !ch.is_ascii_digit() {
            return CodeEvent::Rejected;
        }

        let was_complete = self.is_complete();
        self.slots[index] = Some(ch);
        if index + 1 < OTP_LENGTH {
            self.focus = index + 1;
        }

        if self.is_complete() && (index == OTP_LENGTH - 1 || !was_complete) {
            self.code().map_or(CodeEvent::Updated, CodeEvent::Complete)
        } else {
            CodeEvent::Updated
        }
    }

    /// Types `ch` into the focused slot.
    pub fn type_digit(&mut self, ch: char) -> CodeEvent {
        self.input(self.focus, ch)
    }

    /// Backspace in slot `index`: clears a filled slot, or moves focus back
    /// from an empty one.
    pub fn backspace(&mut self, index: usize) -> CodeEvent {
        if index >= OTP_LENGTH {
            return CodeEvent::Rejected;
        }
        if self.slots[index].take().is_none() && index > 0 {
            self.focus = index - 1;
        } else {
            self.focus = index;
        }
        CodeEvent::Updated
    }

    /// Fills every slot from pasted text.
    ///
    /// Non-digits are stripped and the first six digits are kept. Fewer than
    /// six digits leaves the collector untouched.
    pub fn paste(&mut self, text: &str) -> CodeEvent {
        let digits: Vec<char> = text
            .chars()
            .filter(char::is_ascii_digit)
            .take(OTP_LENGTH)
            .collect();
        if digits.len() < OTP_LENGTH {
            return CodeEvent::Rejected;
        }

        for (slot, digit) in self.slots.iter_mut().zip(digits) {
            *slot = Some(digit);
        }
        self.focus = OTP_LENGTH - 1;
        self.code().map_or(CodeEvent::Updated, CodeEvent::Complete)
    }

    /// Empties every slot and focuses the first one.
    pub fn clear(&mut self) {
        self.slots = [None; OTP_LENGTH];
        self.focus = 0;
    }

    /// Explicit submit: the code when complete, nothing otherwise.
    pub fn submit(&self) -> Option<OtpCode> {
        self.code()
    }
}
