use anyhow::{Context, Result, anyhow};
use keyring::{Entry, Error as KeyringError};

const SERVICE: &str = "steamwebmail";
const PASSWORD_ENV: &str = "STEAMWEBMAIL_PASSWORD";

fn entry(email: &str) -> Result<Entry> {
    Entry::new(SERVICE, email).with_context(|| format!("opening keyring entry for {email}"))
}

/// Remember the account password in the OS keyring, keyed by email.
pub fn store_password(email: &str, password: &str) -> Result<()> {
    entry(email)?
        .set_password(password)
        .with_context(|| format!("storing password for {email}"))
}

/// Password for `email`: `$STEAMWEBMAIL_PASSWORD` if set, else the keyring.
pub fn lookup_password(email: &str) -> Result<String> {
    let from_env = std::env::var(PASSWORD_ENV).ok();
    pick_password(email, from_env, || match entry(email)?.get_password() {
        Ok(p) => Ok(Some(p)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(e) => Err(anyhow!(e)).with_context(|| format!("reading password for {email}")),
    })
}

fn pick_password(
    email: &str,
    from_env: Option<String>,
    from_keyring: impl FnOnce() -> Result<Option<String>>,
) -> Result<String> {
    if let Some(p) = from_env.filter(|p| !p.is_empty()) {
        return Ok(p);
    }
    from_keyring()?.ok_or_else(|| {
        anyhow!("no password for {email}: set {PASSWORD_ENV} or run `steamwebmail set-password`")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_wins_without_touching_keyring() {
        let p = pick_password("me@steamwebmail.com", Some("from-env".into()), || {
            panic!("keyring must not be read")
        })
        .unwrap();
        assert_eq!(p, "from-env");
    }

    #[test]
    fn empty_env_falls_back_to_keyring() {
        let p = pick_password("me@steamwebmail.com", Some(String::new()), || {
            Ok(Some("stored".into()))
        })
        .unwrap();
        assert_eq!(p, "stored");
    }

    #[test]
    fn missing_everywhere_names_the_fix() {
        let err = pick_password("me@steamwebmail.com", None, || Ok(None)).unwrap_err();
        assert!(err.to_string().contains("set-password"));
    }
}
