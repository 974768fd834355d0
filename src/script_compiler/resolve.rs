//! resolve.rs - Pass 2: patch label slots
//!
//! Each forward reference names a label and the 2-byte slot reserved for it
//! during pass 1. Patches are independent of each other, so the log is
//! applied in the order it was recorded. An undefined label leaves its slot
//! at zero.

use crate::script_compiler::assembler::Assembler;
use crate::script_compiler::error::DiagnosticKind;

impl Assembler<'_> {
    pub(crate) fn resolve_forward_references(&mut self) {
        log::info!(
            "Resolving {} forward references against {} labels",
            self.references.len(),
            self.labels.len()
        );

        let references = std::mem::take(&mut self.references);
        let mut patched = 0;

        for reference in references.iter() {
            let Some(address) = self.labels.lookup(&reference.label) else {
                self.report_at(
                    DiagnosticKind::UndefinedLabel,
                    format!("Cannot find label '{}'.", reference.label),
                    reference.line,
                    &reference.source,
                );
                continue;
            };

            if address > u16::MAX as usize {
                self.report_at(
                    DiagnosticKind::ValueTruncation,
                    format!(
                        "Address 0x{:x} of label '{}' does not fit in 16 bits.",
                        address, reference.label
                    ),
                    reference.line,
                    &reference.source,
                );
            }

            if self.output.patch_word(reference.location, address as u16) {
                log::trace!(
                    "patched 0x{:04x} <- '{}' (0x{:04x})",
                    reference.location,
                    reference.label,
                    address
                );
                patched += 1;
            } else {
                log::error!(
                    "forward reference slot 0x{:04x} for '{}' lies outside the output",
                    reference.location,
                    reference.label
                );
            }
        }

        self.references = references;
        log::debug!("{}/{} forward references patched", patched, self.references.len());
    }
}
