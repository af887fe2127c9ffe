//! Small console games bundled with the shell

use crate::console::Console;
use rand::Rng;

/// Lowest possible secret
pub const GUESS_MIN: u32 = 1;
/// Highest possible secret
pub const GUESS_MAX: u32 = 100;

/// Play one round of guess-the-number with a random secret
pub fn guess(console: &mut dyn Console) {
    let secret = rand::thread_rng().gen_range(GUESS_MIN..=GUESS_MAX);
    guess_round(secret, console);
}

/// Round logic with the secret injected, so tests can drive it
pub fn guess_round(secret: u32, console: &mut dyn Console) {
    console.write(&format!(
        "I'm thinking of a number between {} and {}. 'q' gives up.\n",
        GUESS_MIN, GUESS_MAX
    ));

    let mut attempts = 0u32;
    loop {
        console.write("? ");
        let input = match console.read_line() {
            Some(line) => line,
            None => return,
        };
        let input = input.trim();
        if input == "q" {
            console.write(&format!("The number was {}\n", secret));
            return;
        }

        let guess: u32 = match input.parse() {
            Ok(value) => value,
            Err(_) => {
                console.write("Enter a number, or 'q' to give up\n");
                continue;
            }
        };

        attempts += 1;
        if guess < secret {
            console.write("Higher\n");
        } else if guess > secret {
            console.write("Lower\n");
        } else {
            console.write(&format!("Correct! {} attempts\n", attempts));
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    #[test]
    fn test_round_gives_direction_hints() {
        let mut console = ScriptedConsole::with_input(&["10", "80", "42"]);
        guess_round(42, &mut console);

        let output = console.output();
        assert!(output.contains("Higher"));
        assert!(output.contains("Lower"));
        assert!(output.contains("Correct! 3 attempts"));
    }

    #[test]
    fn test_giving_up_reveals_secret() {
        let mut console = ScriptedConsole::with_input(&["1", "q"]);
        guess_round(7, &mut console);
        assert!(console.output().contains("The number was 7"));
    }

    #[test]
    fn test_non_numeric_input_is_reprompted() {
        let mut console = ScriptedConsole::with_input(&["abc", "5"]);
        guess_round(5, &mut console);

        let output = console.output();
        assert!(output.contains("Enter a number"));
        assert!(output.contains("Correct! 1 attempts"));
    }
}
