use crate::exercises::ExerciseId;
use regex::Regex;
use std::sync::OnceLock;

pub const START: &str = "/start";
pub const HELP: &str = "Помощь";
pub const BACK: &str = "Назад";
pub const ENTER: &str = "Ввести";
pub const GENERATE: &str = "Сгенерировать";
pub const EXECUTE: &str = "Выполнить";
pub const SHOW_RESULT: &str = "Результат";
pub const TASK_1: &str = "Задание 1";
pub const TASK_4: &str = "Задание 4";
pub const TASK_5: &str = "Задание 5";

/// What an inbound message asks for, decoded once before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Help,
    Back,
    SelectTask(ExerciseId),
    EnterData,
    Generate,
    Execute,
    ShowResult,
    Text(String),
}

fn task_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Задание\s+(\d+)$").expect("task pattern is valid"))
}

impl Intent {
    pub fn decode(text: &str) -> Self {
        let text = text.trim();
        match text {
            START => Intent::Start,
            HELP => Intent::Help,
            BACK => Intent::Back,
            ENTER => Intent::EnterData,
            GENERATE => Intent::Generate,
            EXECUTE => Intent::Execute,
            SHOW_RESULT => Intent::ShowResult,
            _ => task_pattern()
                .captures(text)
                .and_then(|caps| caps[1].parse::<u32>().ok())
                .and_then(ExerciseId::from_number)
                .map(Intent::SelectTask)
                .unwrap_or_else(|| Intent::Text(text.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_buttons() {
        assert_eq!(Intent::decode("/start"), Intent::Start);
        assert_eq!(Intent::decode(" Выполнить "), Intent::Execute);
        assert_eq!(Intent::decode("Результат"), Intent::ShowResult);
        assert_eq!(Intent::decode("Ввести"), Intent::EnterData);
    }

    #[test]
    fn decodes_task_selection() {
        assert_eq!(Intent::decode("Задание 1"), Intent::SelectTask(ExerciseId::Reconcile));
        assert_eq!(Intent::decode("Задание  4"), Intent::SelectTask(ExerciseId::Digits));
        assert_eq!(Intent::decode("Задание 5"), Intent::SelectTask(ExerciseId::Subarray));
    }

    #[test]
    fn unknown_tasks_are_plain_text() {
        assert_eq!(Intent::decode("Задание 2"), Intent::Text("Задание 2".into()));
        assert_eq!(Intent::decode("Задание"), Intent::Text("Задание".into()));
    }

    #[test]
    fn free_text_is_trimmed() {
        assert_eq!(Intent::decode("  1 2;3 4\n"), Intent::Text("1 2;3 4".into()));
    }
}
