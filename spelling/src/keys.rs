//! Key scripts for driving the controller from text.
//!
//! Plain characters type themselves. Named keys go in angle brackets:
//! `<tab> <enter> <kp-enter> <bs> <del> <left> <right> <up> <down> <esc>
//! <space> <wait>`, and `<lt>` types a literal `<`. Modifier prefixes
//! `ctrl-`, `cmd-`, `opt-` and `shift-` apply to the key that follows, as in
//! `<ctrl-a>` or `<cmd-left>`.

use anyhow::{anyhow, bail};
use enput_core::{KeyCode, KeyEvent, Modifiers};

static NAMED_KEYS: phf::Map<&'static str, KeyCode> = phf::phf_map! {
    "tab" => KeyCode::Tab,
    "enter" => KeyCode::Return,
    "return" => KeyCode::Return,
    "kp-enter" => KeyCode::KeypadEnter,
    "bs" => KeyCode::Backspace,
    "backspace" => KeyCode::Backspace,
    "del" => KeyCode::ForwardDelete,
    "delete" => KeyCode::ForwardDelete,
    "left" => KeyCode::Left,
    "right" => KeyCode::Right,
    "up" => KeyCode::Up,
    "down" => KeyCode::Down,
    "esc" => KeyCode::Escape,
    "escape" => KeyCode::Escape,
    "space" => KeyCode::Space,
};

/// One step of a key script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Key(KeyEvent),
    /// Let the debounce period elapse
    Wait,
}

/// Parse a key script into steps.
pub fn parse_script(script: &str) -> anyhow::Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    let mut rest = script;

    while let Some(ch) = rest.chars().next() {
        if ch != '<' {
            steps.push(ScriptStep::Key(plain_key(ch)));
            rest = &rest[ch.len_utf8()..];
            continue;
        }
        let close = rest
            .find('>')
            .ok_or_else(|| anyhow!("unterminated key name in {:?}", rest))?;
        steps.push(parse_named(&rest[1..close])?);
        rest = &rest[close + 1..];
    }

    Ok(steps)
}

fn plain_key(ch: char) -> KeyEvent {
    if ch == ' ' {
        let mut event = KeyEvent::key(KeyCode::Space);
        event.text = Some(" ".to_string());
        event
    } else {
        KeyEvent::char(ch)
    }
}

fn parse_named(name: &str) -> anyhow::Result<ScriptStep> {
    let lowered = name.to_ascii_lowercase();
    match lowered.as_str() {
        "wait" => return Ok(ScriptStep::Wait),
        "lt" => return Ok(ScriptStep::Key(KeyEvent::char('<'))),
        _ => {}
    }

    let mut modifiers = Modifiers::NONE;
    let mut key = name;
    loop {
        let Some((prefix, tail)) = key.split_once('-') else {
            break;
        };
        match prefix.to_ascii_lowercase().as_str() {
            "ctrl" => modifiers.control = true,
            "cmd" => modifiers.command = true,
            "opt" | "alt" => modifiers.option = true,
            "shift" => modifiers.shift = true,
            _ => break,
        }
        key = tail;
    }
    if key.is_empty() {
        bail!("missing key after modifiers in <{}>", name);
    }

    let event = match NAMED_KEYS.get(key.to_ascii_lowercase().as_str()) {
        Some(&KeyCode::Space) => plain_key(' '),
        Some(&code) => KeyEvent::key(code),
        None => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyEvent::char(ch),
                _ => bail!("unknown key <{}>", name),
            }
        }
    };
    Ok(ScriptStep::Key(event.with_modifiers(modifiers)))
}
