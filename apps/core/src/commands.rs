//! Chat command parsing.
//!
//! Turns one line of chat input into a [`Command`]. Arguments after the
//! command word are trimmed; a command given without its required argument
//! parses to the usage variant.

/// A parsed chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// Set the exclude string for following requests.
    Exclude(String),
    /// Forget the exclude string.
    Clear,
    /// Set the prompt template, or show usage when `None`.
    Prompt(Option<String>),
    /// Set the consecutive request count, or show usage when `None`.
    Count(Option<String>),
    History,
    /// Process the given text.
    Process(String),
    /// A slash command nobody handles.
    Unknown(String),
    /// Blank input.
    Empty,
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Command::Empty;
        }
        if !input.starts_with('/') {
            return Command::Process(input.to_string());
        }

        let (name, rest) = match input.find(char::is_whitespace) {
            Some(pos) => (&input[..pos], input[pos..].trim()),
            None => (input, ""),
        };
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        match name {
            "/start" => Command::Start,
            "/help" => Command::Help,
            "/clear" => Command::Clear,
            "/history" => Command::History,
            "/prompt" => Command::Prompt(argument),
            "/count" => Command::Count(argument.filter(|a| a.chars().all(|c| c.is_ascii_digit()))),
            "/exclude" => match argument {
                Some(words) => Command::Exclude(words),
                None => Command::Unknown(name.to_string()),
            },
            "/process" => match argument {
                Some(text) => Command::Process(text),
                None => Command::Unknown(name.to_string()),
            },
            other => Command::Unknown(other.to_string()),
        }
    }
}

pub const HELP_TEXT: &str = "\
Справка:

/prompt <текст> - установить промпт (переменные {text} и {exc})
/count <1-10> - сколько раз подряд выполнять запрос
/exclude слово1, слово2 - слова для исключения (и однокоренные)
/clear - сбросить слова для исключения
/process <текст> - обработать текст (или просто отправь текст)
/history - последние запросы за 7 дней

Пример:
/exclude привет, дела
Привет мир как дела";

pub const WELCOME_TEXT: &str = "\
Привет! Я перемешиваю слова в тексте и убираю указанные слова вместе с однокоренными.

Отправь текст или набери /help.";

pub const PROMPT_USAGE: &str =
    "Использование: /prompt <текст промпта>\nПример: /prompt Обработай текст: {text}. Исключи: {exc}.";

pub const COUNT_USAGE: &str = "Использование: /count <число от 1 до 10>";
