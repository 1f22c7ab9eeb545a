mod dispatch;
mod letter;
mod provider;

pub use dispatch::{send_letters_for_job, DispatchSummary};
pub use letter::{render_letter, wrap_letter_html};
pub use provider::{
    provider_from_config, Address, LetterProvider, LetterRequest, LetterResponse, LetterStatus,
    LobClient, MailerError, MockProvider,
};
