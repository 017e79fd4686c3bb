use std::io::{self, BufRead, Write};

/// One prompt/response exchange with the operator: show the question for a
/// phone number, return one raw line of input.
pub(crate) trait Prompt {
    fn ask(&mut self, number: &str) -> io::Result<String>;
}

/// Terminal prompt. Blocks the run until the operator answers; closing stdin
/// surfaces as `UnexpectedEof`, which is the cancellation path out of the
/// otherwise unbounded retry loop in the gender directory.
pub(crate) struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, number: &str) -> io::Result<String> {
        print!("What is the gender (m/f) of {number}: ");
        io::stdout().flush()?;
        let mut answer = String::new();
        let read = io::stdin().lock().read_line(&mut answer)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed while waiting for an answer",
            ));
        }
        Ok(answer)
    }
}

/// Replays a fixed list of answers and records every number it was asked
/// about. Errors once the script runs dry so a misbehaving retry loop fails a
/// test instead of spinning.
#[cfg(test)]
pub(crate) struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub(crate) asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub(crate) fn new(answers: &[&str]) -> ScriptedPrompt {
        ScriptedPrompt {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn ask(&mut self, number: &str) -> io::Result<String> {
        self.asked.push(number.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "scripted prompt exhausted")
        })
    }
}
