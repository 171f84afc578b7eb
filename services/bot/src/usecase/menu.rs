//! Screens shown by the bot. Copy is short placeholder text.

use crate::domain::action::{
    AROMAS_PER_LINE, AromaLine, CallbackAction, ProblemKind, ServiceTopic,
};
use crate::domain::types::{
    Button, CREDIT_COOLDOWN_HOURS, FeedbackTopic, IssuedCredit, Keyboard, Screen,
};

fn back(to: CallbackAction) -> Keyboard {
    Keyboard::default().button("⬅️ Back", to)
}

fn home() -> Keyboard {
    Keyboard::default().button("🏠 Menu", CallbackAction::MainMenu)
}

pub fn main_menu() -> Screen {
    Screen::new("🏠 Main menu").with_keyboard(main_keyboard())
}

pub fn welcome() -> Screen {
    Screen::new("👋 Welcome to Pshik, the aroma service.\n\nChoose a section:")
        .with_keyboard(main_keyboard())
}

fn main_keyboard() -> Keyboard {
    Keyboard::default()
        .row(vec![
            button("🛠 Service", CallbackAction::ServiceMenu),
            button("⚠️ Problem", CallbackAction::ProblemMenu),
        ])
        .row(vec![
            button("🌿 Aromas", CallbackAction::AromasMenu),
            button("📄 Certificates", CallbackAction::CertsMenu),
        ])
        .button("💬 Feedback", CallbackAction::FeedbackMenu)
}

fn button(text: &str, action: CallbackAction) -> Button {
    Button::new(text, action)
}

pub fn service_menu() -> Screen {
    let mut keyboard = Keyboard::default();
    for topic in ServiceTopic::ALL {
        keyboard = keyboard.button(service_title(topic), CallbackAction::Service(topic));
    }
    Screen::new("🛠 Service\n\nWhat would you like to know?")
        .with_keyboard(keyboard.button("⬅️ Back", CallbackAction::MainMenu))
}

fn service_title(topic: ServiceTopic) -> &'static str {
    match topic {
        ServiceTopic::How => "📖 How to use",
        ServiceTopic::Pay => "💳 Payment",
        ServiceTopic::Spray => "💨 One or two sprays",
        ServiceTopic::Where => "🎯 Where to spray",
        ServiceTopic::Safe => "⚠️ Safety",
    }
}

pub fn service_page(topic: ServiceTopic) -> Screen {
    let body = match topic {
        ServiceTopic::How => "1. Pick an aroma\n2. Pay\n3. Press the button on the device",
        ServiceTopic::Pay => "QR payment or contactless card.",
        ServiceTopic::Spray => "1 for a light touch, 2 for a rich trail.",
        ServiceTopic::Where => "Neck, behind the ear or clothing. Never in the face.",
        ServiceTopic::Safe => "Individual reactions are possible.",
    };
    Screen::new(format!("{}\n\n{body}", service_title(topic))).with_keyboard(
        back(CallbackAction::ServiceMenu).button("🏠 Menu", CallbackAction::MainMenu),
    )
}

pub fn problem_menu() -> Screen {
    Screen::new("⚠️ What went wrong?").with_keyboard(
        Keyboard::default()
            .button("Device did not spray", CallbackAction::Problem(ProblemKind::NoSpray))
            .button("Weak spray", CallbackAction::Problem(ProblemKind::Weak))
            .button("Aroma ran out", CallbackAction::Problem(ProblemKind::Empty))
            .button("Something else", CallbackAction::ProblemOther)
            .button("⬅️ Back", CallbackAction::MainMenu),
    )
}

pub fn compensation(issued: &IssuedCredit) -> Screen {
    Screen::new(format!(
        "🎁 Compensation\n\nYour free spray is ready.\n\nCode: {}\nValid until: {}\n\nEnter the code on the device.",
        issued.code,
        issued.expires_at.format("%Y-%m-%d"),
    ))
    .with_keyboard(home())
}

/// Shown when a credit is needed but we do not know which device the user is at.
pub fn scan_device() -> Screen {
    Screen::new("⚠️ Please scan the QR code on the device so we can link the compensation to it.")
        .with_keyboard(home())
}

/// Shown when the user's last credit of this kind was redeemed too recently.
pub fn cooldown() -> Screen {
    Screen::new(format!(
        "You have already used a free spray recently. A new one can be issued \
         {CREDIT_COOLDOWN_HOURS} hours after the last one was used.\n\n\
         If the device keeps failing, describe the problem and we will look into it."
    ))
    .with_keyboard(
        Keyboard::default()
            .button("Describe the problem", CallbackAction::ProblemOther)
            .button("🏠 Menu", CallbackAction::MainMenu),
    )
}

pub fn temporarily_unavailable() -> Screen {
    Screen::new("Sorry, we could not create a code right now. Please try again in a minute.")
        .with_keyboard(home())
}

pub fn aromas_menu() -> Screen {
    Screen::new("🌿 Aromas").with_keyboard(
        Keyboard::default()
            .button("👩 Women", CallbackAction::AromaList(AromaLine::Women))
            .button("👨 Men", CallbackAction::AromaList(AromaLine::Men))
            .button("⬅️ Back", CallbackAction::MainMenu),
    )
}

fn line_title(line: AromaLine) -> &'static str {
    match line {
        AromaLine::Women => "👩 Women's aromas",
        AromaLine::Men => "👨 Men's aromas",
    }
}

pub fn aroma_list(line: AromaLine) -> Screen {
    let mut keyboard = Keyboard::default();
    for number in 1..=AROMAS_PER_LINE {
        keyboard = keyboard.button(
            format!("{}{number}", line.letter()),
            CallbackAction::Aroma(line, number),
        );
    }
    Screen::new(format!("{}\n\nChoose an aroma:", line_title(line))).with_keyboard(
        keyboard
            .button("⬅️ Back", CallbackAction::AromasMenu)
            .button("🏠 Menu", CallbackAction::MainMenu),
    )
}

pub fn aroma_card(line: AromaLine, number: u8) -> Screen {
    Screen::new(format!(
        "{} {}{number}\n\nFor: work / walk / evening\nWhen: morning / day / night\n\n\
         Sprays: 1 is light, 2 is rich.\nTip: start with 1 if it is your first time.",
        line_title(line),
        line.letter(),
    ))
    .with_keyboard(
        back(CallbackAction::AromaList(line)).button("🏠 Menu", CallbackAction::MainMenu),
    )
}

pub fn certs() -> Screen {
    Screen::new("📄 Certificates\n\nComing soon.").with_keyboard(back(CallbackAction::MainMenu))
}

pub fn feedback_menu() -> Screen {
    Screen::new("💬 How was it?").with_keyboard(
        Keyboard::default()
            .row(vec![
                button("👍 Good", CallbackAction::FeedbackGood),
                button("👎 Bad", CallbackAction::FeedbackBad),
            ])
            .button("✍️ Write to us", CallbackAction::FeedbackWrite)
            .button("⬅️ Back", CallbackAction::MainMenu),
    )
}

/// The session is already waiting for an optional follow-up message.
pub fn rating_saved() -> Screen {
    Screen::new("Thank you! Send a few words in one message if you like.")
        .with_keyboard(Keyboard::default().button("No, thanks", CallbackAction::Cancel))
}

pub fn ask_for_text(topic: FeedbackTopic) -> Screen {
    let text = match topic {
        FeedbackTopic::Feedback => "✍️ Send us your feedback in one message.",
        FeedbackTopic::ProblemOther => {
            "Describe the problem in one message and we will look into it."
        }
    };
    Screen::new(text).with_keyboard(Keyboard::default().button("✖️ Cancel", CallbackAction::Cancel))
}

/// What a stored message earned.
pub enum Reward {
    Nothing,
    Gift(IssuedCredit),
    /// A gift was earned but the feedback scope is cooling down.
    Later,
}

pub fn text_received(reward: &Reward) -> Screen {
    let text = match reward {
        Reward::Gift(issued) => format!(
            "Thank you, we got your message.\n\n🎁 A free spray as thanks: {}\nValid until: {}",
            issued.code,
            issued.expires_at.format("%Y-%m-%d"),
        ),
        Reward::Later => format!(
            "Thank you, we got your message.\n\nThe next thank-you spray is available \
             {CREDIT_COOLDOWN_HOURS} hours after the last one was used."
        ),
        Reward::Nothing => "Thank you, we got your message.".to_owned(),
    };
    Screen::new(text).with_keyboard(home())
}

pub fn cancelled() -> Screen {
    Screen::new("Cancelled.").with_keyboard(main_keyboard())
}
