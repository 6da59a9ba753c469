//! Conversation layer: turns one inbound text into one reply.
//!
//! ```text
//! text → Intent::decode → Dispatcher::handle (state × intent) → Reply
//! ```

pub mod dispatcher;
pub mod generator;
pub mod grammar;
pub mod intent;
pub mod messages;

pub use dispatcher::Dispatcher;
pub use grammar::ParseError;
pub use intent::Intent;

use crate::session::ExerciseData;

/// Reply menus. One button per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    Main,
    Task,
}

impl Keyboard {
    pub fn buttons(&self) -> &'static [&'static str] {
        match self {
            Keyboard::Main => &[intent::TASK_1, intent::TASK_4, intent::TASK_5, intent::HELP],
            Keyboard::Task => &[
                intent::ENTER,
                intent::GENERATE,
                intent::EXECUTE,
                intent::SHOW_RESULT,
                intent::BACK,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Multi-line listing of collected inputs, used after saving or generating.
pub fn describe(data: &ExerciseData) -> String {
    match data {
        ExerciseData::Reconcile { first, second } => {
            format!("Массив1: {:?}\nМассив2: {:?}", first, second)
        }
        ExerciseData::Digits {
            first,
            second,
            operation,
        } => {
            let mut text = format!("Число1: {:?}\nЧисло2: {:?}", first, second);
            if let Some(op) = operation {
                text.push_str(&format!("\nОперация: {}", op));
            }
            text
        }
        ExerciseData::Subarray { values, target } => {
            format!("Массив: {:?}\nСумма: {}", values, target)
        }
    }
}
