//! Forward references and the output buffer they patch
//!
//! Every label operand is recorded here at emission time, whether or not the
//! label is already known. Pass 2 walks the log once all lines have been
//! emitted and overwrites the reserved words.

/// Placeholder written for a label operand until pass 2 patches it.
pub const PLACEHOLDER_WORD: [u8; 2] = [0x00, 0x00];

/// A reserved 2-byte slot waiting for a label address.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardReference {
    pub location: usize, // Byte offset of the low byte of the slot
    pub label: String,
    pub line: usize,
    pub source: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceLog {
    references: Vec<ForwardReference>,
}

impl ReferenceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reference: ForwardReference) {
        log::debug!(
            "forward reference to '{}' at 0x{:04x} (line {})",
            reference.label,
            reference.location,
            reference.line
        );
        self.references.push(reference);
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForwardReference> {
        self.references.iter()
    }
}

/// Append-only byte sink whose length is the current code offset.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.bytes.len()
    }

    pub fn emit_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn emit_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Reserve a zeroed word and return where it starts.
    pub fn reserve_word(&mut self) -> usize {
        let location = self.offset();
        self.emit_bytes(&PLACEHOLDER_WORD);
        location
    }

    /// Overwrite two bytes at `location`, low byte first. Returns `false`
    /// if the slot lies outside what has been emitted.
    pub fn patch_word(&mut self, location: usize, value: u16) -> bool {
        match self.bytes.get_mut(location..location + 2) {
            Some(slot) => {
                slot.copy_from_slice(&value.to_le_bytes());
                true
            }
            None => false,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_tracks_length() {
        let mut out = OutputBuffer::new();
        assert_eq!(out.offset(), 0);
        out.emit_u8(0x10);
        out.emit_bytes(&[1, 2, 3]);
        assert_eq!(out.offset(), 4);
    }

    #[test]
    fn test_reserve_and_patch_word() {
        let mut out = OutputBuffer::new();
        out.emit_u8(0x10);
        let slot = out.reserve_word();
        out.emit_u8(0x00);

        assert_eq!(slot, 1);
        assert_eq!(out.as_bytes(), &[0x10, 0x00, 0x00, 0x00]);

        assert!(out.patch_word(slot, 0x1234));
        assert_eq!(out.as_bytes(), &[0x10, 0x34, 0x12, 0x00]);
    }

    #[test]
    fn test_patch_out_of_range_is_refused() {
        let mut out = OutputBuffer::new();
        out.emit_u8(0);
        assert!(!out.patch_word(0, 0xFFFF));
        assert!(!out.patch_word(5, 0xFFFF));
        assert_eq!(out.as_bytes(), &[0]);
    }

    #[test]
    fn test_reference_log_keeps_order() {
        let mut log = ReferenceLog::new();
        for (location, label) in [(1, "B"), (4, "A")] {
            log.push(ForwardReference {
                location,
                label: label.to_string(),
                line: 1,
                source: String::new(),
            });
        }
        let labels: Vec<_> = log.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A"]);
        assert_eq!(log.len(), 2);
    }
}
