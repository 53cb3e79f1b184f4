//! 交互式命令行
//!
//! `You: ` 提示符读行；少量字面命令（exit/quit、语音控制、history）在本层处理，
//! 其余输入整句转发给会话。一轮结束后按当前语音配置尝试朗读回复。

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::error::AgentError;
use crate::session::{Role, Session, SharedState, APOLOGY};
use crate::speech::{SpeechOutcome, SpeechOutput};
use crate::voice::VoiceCommand;

/// 模型转发之前识别的字面语音命令
///
/// 前缀按 ASCII 大小写不敏感匹配，音色名从原始输入切出（保留用户原文大小写）；
/// 切片用 get 做边界检查，任意 Unicode 输入都不会 panic。
fn parse_literal_voice_command(input: &str) -> Option<VoiceCommand> {
    const SET_VOICE_PREFIX: &str = "set voice:";

    if input.eq_ignore_ascii_case("list voices") {
        return Some(VoiceCommand::ListVoices);
    }
    if input.eq_ignore_ascii_case("voice status") {
        return Some(VoiceCommand::Status);
    }
    if input.eq_ignore_ascii_case("enable voice") {
        return Some(VoiceCommand::Enable);
    }
    if input.eq_ignore_ascii_case("disable voice") {
        return Some(VoiceCommand::Disable);
    }

    let head = input.get(..SET_VOICE_PREFIX.len())?;
    if head.eq_ignore_ascii_case(SET_VOICE_PREFIX) {
        let name = input.get(SET_VOICE_PREFIX.len()..)?;
        return Some(VoiceCommand::SetVoice(name.trim().to_string()));
    }
    None
}

/// 打印当前对话转写（角色 + 内容）
fn print_history(session: &Session) {
    if session.history().is_empty() {
        println!("(history is empty)");
        return;
    }
    for msg in session.history().messages() {
        let role = match msg.role {
            Role::System => "system",
            Role::User => "you",
            Role::Assistant => "lector",
            Role::Tool => "tool",
        };
        println!("[{}] {}", role, msg.content);
    }
}

/// 主循环：读入一行，处理字面命令或跑一轮会话，直到 exit/quit/EOF
pub async fn run_repl(
    session: &mut Session,
    state: SharedState,
    speech: &SpeechOutput,
) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("Lector document teacher. Load a .pdf or .docx and ask away (exit/quit to leave).");

    loop {
        let line = match rl.readline("You: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        match input.to_lowercase().as_str() {
            "exit" | "quit" => break,
            "history" => {
                print_history(session);
                continue;
            }
            _ => {}
        }

        if let Some(cmd) = parse_literal_voice_command(input) {
            let result = {
                let mut state = state.lock().expect("session state lock");
                state.voice.apply(cmd)
            };
            match result {
                Ok(reply) => println!("{}", reply),
                Err(e) => println!("{}", e),
            }
            continue;
        }

        match session.run_turn(input).await {
            Ok(response) => {
                println!("Lector: {}", response);
                let voice = state.lock().expect("session state lock").voice.clone();
                match speech.speak(&response, &voice).await {
                    SpeechOutcome::Played { chunks } => {
                        tracing::debug!(chunks, "spoke response");
                    }
                    SpeechOutcome::Skipped(reason) => {
                        tracing::debug!(?reason, "speech skipped");
                    }
                }
            }
            Err(AgentError::LlmError(e)) => {
                tracing::warn!(error = %e, "model invocation failed, turn rolled back");
                println!("{}", APOLOGY);
            }
            Err(e) => {
                tracing::error!(error = %e, "turn failed");
                println!("Something went wrong: {}", e);
            }
        }
    }

    let (prompt, completion, total) = session.token_usage();
    if total > 0 {
        println!(
            "Token usage: {} prompt + {} completion = {} total",
            prompt, completion, total
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_voice_commands_are_recognized() {
        assert_eq!(
            parse_literal_voice_command("list voices"),
            Some(VoiceCommand::ListVoices)
        );
        assert_eq!(
            parse_literal_voice_command("Enable Voice"),
            Some(VoiceCommand::Enable)
        );
        assert_eq!(
            parse_literal_voice_command("set voice:Matthew"),
            Some(VoiceCommand::SetVoice("Matthew".to_string()))
        );
        assert_eq!(parse_literal_voice_command("tell me a story"), None);
    }

    #[test]
    fn set_voice_preserves_original_case() {
        // 目录匹配大小写不敏感，但传入名保持用户原文
        assert_eq!(
            parse_literal_voice_command("SET VOICE:Amy"),
            Some(VoiceCommand::SetVoice("Amy".to_string()))
        );
    }

    #[test]
    fn set_voice_with_non_ascii_name_does_not_panic() {
        // 'ẞ' 小写后字节数变化；音色名必须从原始输入安全切出，
        // 未知音色由目录校验拒绝，而不是在解析时崩溃
        assert_eq!(
            parse_literal_voice_command("set voice:ẞ"),
            Some(VoiceCommand::SetVoice("ẞ".to_string()))
        );
        assert_eq!(
            parse_literal_voice_command("SET VOICE:Ångström"),
            Some(VoiceCommand::SetVoice("Ångström".to_string()))
        );
        // 前缀位置落在多字节字符内也只能是“不匹配”，不是 panic
        assert_eq!(parse_literal_voice_command("set voicẞ"), None);
        assert_eq!(parse_literal_voice_command("ẞ"), None);
    }
}
