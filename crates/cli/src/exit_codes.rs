//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | Documents differ (only with `compare --exit-code`)   |
//! | 2    | CLI usage error (bad args, unreadable config path)   |
//! | 3    | Input is not a readable .docx document               |
//! | 4    | Config file failed to parse or validate              |
//! | 5    | Could not write output                               |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use docdelta_io::UnreadableDocument;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Documents differ. Like `diff(1)`, exit 1 means "files differ."
pub const EXIT_DIFFERENCES: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input document could not be opened or is not a valid .docx container.
pub const EXIT_UNREADABLE: u8 = 3;

/// Config file parse or validation failure.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Writing the report (stdout or --output file) failed.
pub const EXIT_OUTPUT: u8 = 5;

/// Hint shown alongside an unreadable-document error.
pub fn unreadable_hint(err: &UnreadableDocument) -> Option<&'static str> {
    match err {
        UnreadableDocument::Container(_) => {
            Some("only .docx (Office Open XML) files are supported; re-save legacy .doc files as .docx")
        }
        UnreadableDocument::MissingPart(_) => {
            Some("the archive is not a Word document (no word/document.xml)")
        }
        UnreadableDocument::Malformed { .. } => Some("the file may be truncated or corrupt"),
        UnreadableDocument::Io(_) => None,
    }
}
