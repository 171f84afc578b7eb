//! Callback actions carried in inline-button `callback_data`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceTopic {
    How,
    Pay,
    Spray,
    Where,
    Safe,
}

impl ServiceTopic {
    pub const ALL: [Self; 5] = [Self::How, Self::Pay, Self::Spray, Self::Where, Self::Safe];

    fn tag(self) -> &'static str {
        match self {
            Self::How => "HOW",
            Self::Pay => "PAY",
            Self::Spray => "SPRAY",
            Self::Where => "WHERE",
            Self::Safe => "SAFE",
        }
    }
}

/// Problems that are compensated with a credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    /// Paid but the device did not spray.
    NoSpray,
    Weak,
    Empty,
}

impl ProblemKind {
    pub const ALL: [Self; 3] = [Self::NoSpray, Self::Weak, Self::Empty];

    /// Validity of the compensation credit.
    pub fn compensation_days(self) -> i64 {
        match self {
            Self::NoSpray => 30,
            Self::Weak | Self::Empty => 7,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::NoSpray => "NO_SPRAY",
            Self::Weak => "WEAK",
            Self::Empty => "EMPTY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AromaLine {
    Women,
    Men,
}

impl AromaLine {
    pub fn letter(self) -> char {
        match self {
            Self::Women => 'W',
            Self::Men => 'M',
        }
    }
}

/// Aromas per line, numbered from 1.
pub const AROMAS_PER_LINE: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    MainMenu,
    ServiceMenu,
    Service(ServiceTopic),
    ProblemMenu,
    Problem(ProblemKind),
    ProblemOther,
    AromasMenu,
    AromaList(AromaLine),
    Aroma(AromaLine, u8),
    CertsMenu,
    FeedbackMenu,
    FeedbackGood,
    FeedbackBad,
    FeedbackWrite,
    Cancel,
    /// Anything we do not recognise; answered with the main menu.
    Unknown(String),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Self {
        match data {
            "CB_MAIN_MENU" => Self::MainMenu,
            "CB_SERVICE_MENU" => Self::ServiceMenu,
            "CB_SERVICE_HOW" => Self::Service(ServiceTopic::How),
            "CB_SERVICE_PAY" => Self::Service(ServiceTopic::Pay),
            "CB_SERVICE_SPRAY" => Self::Service(ServiceTopic::Spray),
            "CB_SERVICE_WHERE" => Self::Service(ServiceTopic::Where),
            "CB_SERVICE_SAFE" => Self::Service(ServiceTopic::Safe),
            "CB_PROBLEM_MENU" => Self::ProblemMenu,
            "CB_PROBLEM_NO_SPRAY" => Self::Problem(ProblemKind::NoSpray),
            "CB_PROBLEM_WEAK" => Self::Problem(ProblemKind::Weak),
            "CB_PROBLEM_EMPTY" => Self::Problem(ProblemKind::Empty),
            "CB_PROBLEM_OTHER" => Self::ProblemOther,
            "CB_AROMAS_MENU" => Self::AromasMenu,
            "CB_AROMAS_WOMEN_LIST" => Self::AromaList(AromaLine::Women),
            "CB_AROMAS_MEN_LIST" => Self::AromaList(AromaLine::Men),
            "CB_CERTS_MENU" => Self::CertsMenu,
            "CB_FEEDBACK_MENU" => Self::FeedbackMenu,
            "CB_FEEDBACK_GOOD" => Self::FeedbackGood,
            "CB_FEEDBACK_BAD" => Self::FeedbackBad,
            "CB_FEEDBACK_WRITE" => Self::FeedbackWrite,
            "CB_CANCEL" => Self::Cancel,
            other => parse_aroma(other).unwrap_or_else(|| Self::Unknown(other.to_owned())),
        }
    }
}

fn parse_aroma(data: &str) -> Option<CallbackAction> {
    let rest = data.strip_prefix("CB_AROMA_")?;
    let mut chars = rest.chars();
    let line = match chars.next()? {
        'W' => AromaLine::Women,
        'M' => AromaLine::Men,
        _ => return None,
    };
    // Exactly one digit: no sign, no leading zeros.
    let digit = chars.next()?.to_digit(10)?;
    if chars.next().is_some() {
        return None;
    }
    let number = u8::try_from(digit).ok()?;
    (1..=AROMAS_PER_LINE)
        .contains(&number)
        .then_some(CallbackAction::Aroma(line, number))
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MainMenu => f.write_str("CB_MAIN_MENU"),
            Self::ServiceMenu => f.write_str("CB_SERVICE_MENU"),
            Self::Service(topic) => write!(f, "CB_SERVICE_{}", topic.tag()),
            Self::ProblemMenu => f.write_str("CB_PROBLEM_MENU"),
            Self::Problem(kind) => write!(f, "CB_PROBLEM_{}", kind.tag()),
            Self::ProblemOther => f.write_str("CB_PROBLEM_OTHER"),
            Self::AromasMenu => f.write_str("CB_AROMAS_MENU"),
            Self::AromaList(AromaLine::Women) => f.write_str("CB_AROMAS_WOMEN_LIST"),
            Self::AromaList(AromaLine::Men) => f.write_str("CB_AROMAS_MEN_LIST"),
            Self::Aroma(line, number) => write!(f, "CB_AROMA_{}{number}", line.letter()),
            Self::CertsMenu => f.write_str("CB_CERTS_MENU"),
            Self::FeedbackMenu => f.write_str("CB_FEEDBACK_MENU"),
            Self::FeedbackGood => f.write_str("CB_FEEDBACK_GOOD"),
            Self::FeedbackBad => f.write_str("CB_FEEDBACK_BAD"),
            Self::FeedbackWrite => f.write_str("CB_FEEDBACK_WRITE"),
            Self::Cancel => f.write_str("CB_CANCEL"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl From<CallbackAction> for String {
    fn from(action: CallbackAction) -> Self {
        action.to_string()
    }
}
