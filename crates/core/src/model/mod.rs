mod answers;
mod ids;
mod participant;
mod question;
mod quiz;

pub use answers::AnswerRecord;
pub use ids::{ParseIdError, QuizId, SessionId};
pub use participant::{Participant, ParticipantError};
pub use question::{OptionSlot, Question, QuestionError};
pub use quiz::{Quiz, QuizError};
