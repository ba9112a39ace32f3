use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "CIPHERLAB_PASSWORD";

fn from_env() -> Option<Zeroizing<String>> {
    //  CIPHERLAB_PASSWORD="correct horse" cipherlab aes-encrypt "hello"
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

fn from_pipe() -> Result<Option<Zeroizing<String>>> {
    //  echo "correct horse" | cipherlab aes-decrypt --file bundle.json
    if io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut buf = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut buf)?;
    trim_newline(&mut buf);
    Ok((!buf.is_empty()).then_some(buf))
}

/// Password for decryption: env var, then piped stdin, then a prompt.
pub fn read_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = from_env() {
        return Ok(pw);
    }
    if let Some(pw) = from_pipe()? {
        return Ok(pw);
    }

    if io::stdin().is_terminal() {
        let pw = Zeroizing::new(rpassword::prompt_password("Password: ")?);
        if !pw.is_empty() {
            return Ok(pw);
        }
    }

    bail!("No password provided")
}

/// Password for encryption. Same sources as [`read_password`], but an
/// interactive prompt asks twice.
pub fn read_new_password_with_confirmation() -> Result<Zeroizing<String>> {
    if let Some(pw) = from_env() {
        return Ok(pw);
    }
    if let Some(pw) = from_pipe()? {
        return Ok(pw);
    }
    if !io::stdin().is_terminal() {
        bail!("No password provided");
    }

    let pw1 = Zeroizing::new(rpassword::prompt_password("New password: ")?);
    let pw2 = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);

    if pw1.is_empty() {
        bail!("password cannot be empty");
    }

    if pw1 != pw2 {
        bail!("passwords do not match");
    }

    Ok(pw1)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_newline_strips_line_endings_only() {
        let mut s = String::from("pass word \r\n");
        trim_newline(&mut s);
        assert_eq!(s, "pass word ");
    }
}
