use super::{describe, generator, grammar, messages, Intent, Keyboard, Reply};
use crate::cache::{CacheStats, DigitCache};
use crate::exercises::{
    count_subarrays, reconcile, ErrorKind, ExerciseError, ExerciseId, ExerciseOutcome,
    ExerciseResult,
};
use crate::session::{ChatState, ExerciseData, Session, SessionStore, UserId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

/// Owns every user's session and the arithmetic cache. Messages are handled
/// one at a time, each to completion.
pub struct Dispatcher<S: SessionStore> {
    sessions: S,
    cache: DigitCache,
    rng: StdRng,
}

enum Execution {
    Done(ExerciseOutcome),
    NeedsOperator,
}

impl<S: SessionStore> Dispatcher<S> {
    pub fn new(sessions: S, cache: DigitCache) -> Self {
        Self::with_rng(sessions, cache, StdRng::from_entropy())
    }

    pub fn with_rng(sessions: S, cache: DigitCache, rng: StdRng) -> Self {
        Self {
            sessions,
            cache,
            rng,
        }
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn handle(&mut self, user: UserId, text: &str) -> Reply {
        let intent = Intent::decode(text);
        debug!(user, ?intent, "Dispatching");

        let Self {
            sessions,
            cache,
            rng,
        } = self;
        let session = sessions.get_or_create(user);
        session.touch();

        match (session.state, intent) {
            (_, Intent::Start) => {
                session.reset();
                info!("User {} started", user);
                Reply::with_keyboard(messages::WELCOME, Keyboard::Main)
            }
            (_, Intent::Help) => Reply::text(messages::HELP),
            (_, Intent::Back) => {
                session.reset();
                Reply::with_keyboard(messages::MAIN_MENU, Keyboard::Main)
            }
            (_, Intent::SelectTask(exercise)) => {
                session.select(exercise);
                Reply::with_keyboard(
                    format!("Задание {}:\n{}", exercise, messages::task_details(exercise)),
                    Keyboard::Task,
                )
            }
            (_, Intent::EnterData) => match session.task {
                Some(exercise) => Reply::text(grammar::format_hint(exercise)),
                None => Reply::text(messages::CHOOSE_TASK_FIRST),
            },
            (_, Intent::Generate) => match session.task {
                Some(exercise) => {
                    let data = generator::generate(exercise, rng);
                    let text = format!("Сгенерировано:\n{}", describe(&data));
                    session.data = Some(data);
                    info!("User {} generated data for task {}", user, exercise);
                    Reply::text(text)
                }
                None => Reply::text(messages::CHOOSE_TASK_FIRST),
            },
            (_, Intent::Execute) => execute(user, session, cache),
            (_, Intent::ShowResult) => match &session.result {
                Some(result) => Reply::text(format!("Результат: {}", result)),
                None => Reply::text(messages::NOT_COMPUTED),
            },
            (ChatState::Main, Intent::Text(_)) => Reply::text(messages::USE_MENU),
            (ChatState::Task(exercise), Intent::Text(text)) => accept_input(session, exercise, &text),
            (ChatState::AwaitOperator, Intent::Text(text)) => {
                accept_operator(user, session, cache, &text)
            }
        }
    }
}

fn accept_input(session: &mut Session, exercise: ExerciseId, text: &str) -> Reply {
    if exercise == ExerciseId::Digits {
        if let Some(op) = grammar::parse_operator(text) {
            return match &mut session.data {
                Some(ExerciseData::Digits { operation, .. }) => {
                    *operation = Some(op.to_string());
                    Reply::text(format!("Операция сохранена: {}", op))
                }
                _ => Reply::text(grammar::format_hint(exercise)),
            };
        }
    }

    match grammar::parse(exercise, text) {
        Ok(data) => {
            let text = format!("Сохранено:\n{}", describe(&data));
            session.data = Some(data);
            Reply::text(text)
        }
        Err(e) => {
            debug!(error = %e, "Input rejected");
            Reply::text(grammar::format_hint(exercise))
        }
    }
}

fn accept_operator(user: UserId, session: &mut Session, cache: &mut DigitCache, text: &str) -> Reply {
    let Some(op) = grammar::parse_operator(text) else {
        return Reply::text(messages::ENTER_OPERATION);
    };
    if let Some(ExerciseData::Digits { operation, .. }) = &mut session.data {
        *operation = Some(op.to_string());
    }
    session.state = ChatState::Task(ExerciseId::Digits);

    let outcome = execute(user, session, cache);
    Reply::text(format!("Операция сохранена: {}\n{}", op, outcome.text))
}

fn execute(user: UserId, session: &mut Session, cache: &mut DigitCache) -> Reply {
    let Some(data) = session.data.as_ref() else {
        return Reply::text(messages::NEED_DATA);
    };
    let exercise = data.exercise();

    match run(data, cache) {
        Ok(Execution::Done(outcome)) => {
            info!(user, task = exercise.number(), result = %outcome, "Exercise executed");
            let text = match &outcome {
                ExerciseOutcome::SubarrayCount(count) => format!("Найдено подмассивов: {}", count),
                other => format!("Результат: {}", other),
            };
            session.result = Some(outcome);
            Reply::text(text)
        }
        Ok(Execution::NeedsOperator) => {
            session.state = ChatState::AwaitOperator;
            Reply::text(messages::ENTER_OPERATION)
        }
        Err(e) => {
            report(user, exercise, &e);
            Reply::text(format!("Ошибка: {}", e.user_message()))
        }
    }
}

fn run(data: &ExerciseData, cache: &mut DigitCache) -> ExerciseResult<Execution> {
    let outcome = match data {
        ExerciseData::Reconcile { first, second } => {
            ExerciseOutcome::Reconciled(reconcile(first, second)?)
        }
        ExerciseData::Digits {
            first,
            second,
            operation,
        } => match operation {
            Some(symbol) => ExerciseOutcome::Digits(cache.compute(first, second, symbol)?),
            None => return Ok(Execution::NeedsOperator),
        },
        ExerciseData::Subarray { values, target } => {
            ExerciseOutcome::SubarrayCount(count_subarrays(values, *target))
        }
    };
    Ok(Execution::Done(outcome))
}

fn report(user: UserId, exercise: ExerciseId, e: &ExerciseError) {
    match e.kind() {
        ErrorKind::Internal => error!(user, "Error in task {}: {}", exercise, e),
        ErrorKind::Validation | ErrorKind::Unsupported => {
            warn!(user, "Error in task {}: {}", exercise, e)
        }
    }
}
