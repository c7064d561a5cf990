// ── Authentication chain ─────────────────────────────────────────────────────

use log::debug;
use rxfer_core::{Credentials, TransferError, TransferResult};
use ssh2::Session;
use std::path::Path;

/// Credential extra: path of a private key file.
pub const EXTRA_PRIVATE_KEY: &str = "private_key";
/// Credential extra: path of the matching public key (optional).
pub const EXTRA_PUBLIC_KEY: &str = "public_key";
/// Credential extra: passphrase of the private key.
pub const EXTRA_PASSPHRASE: &str = "passphrase";
/// Credential extra: `"true"` to try ssh-agent identities first.
pub const EXTRA_AGENT: &str = "agent";

struct PasswordPrompt {
    password: String,
}

impl ssh2::KeyboardInteractivePrompt for PasswordPrompt {
    fn prompt(
        &mut self,
        _username: &str,
        _instructions: &str,
        prompts: &[ssh2::Prompt],
    ) -> Vec<String> {
        prompts.iter().map(|_| self.password.clone()).collect()
    }
}

/// Authenticate `session` with whatever `credentials` provide, in order:
/// agent, explicit key file, default key files (only when no password was
/// given), password, keyboard-interactive. Returns the method that worked.
pub fn authenticate(session: &Session, credentials: &Credentials) -> TransferResult<String> {
    let user = credentials.username.as_str();
    let passphrase = credentials.extra(EXTRA_PASSPHRASE);

    // 1. Agent
    if credentials.extra_flag(EXTRA_AGENT) {
        if let Ok(mut agent) = session.agent() {
            if agent.connect().is_ok() {
                let _ = agent.list_identities();
                for identity in agent.identities().unwrap_or_default() {
                    if agent.userauth(user, &identity).is_ok() && session.authenticated() {
                        return Ok("agent".to_string());
                    }
                }
            }
        }
        debug!("ssh-agent authentication for {} did not succeed", user);
    }

    // 2. Explicit key file
    if let Some(key_path) = credentials.extra(EXTRA_PRIVATE_KEY) {
        let public = credentials.extra(EXTRA_PUBLIC_KEY).map(Path::new);
        match session.userauth_pubkey_file(user, public, Path::new(key_path), passphrase) {
            Ok(()) if session.authenticated() => return Ok("publickey".to_string()),
            Ok(()) => {}
            Err(e) => debug!("Key file {} rejected for {}: {}", key_path, user, e),
        }
    }

    let password = credentials.password();

    // 3. Default key paths (~/.ssh/id_ed25519, id_rsa, ...)
    if password.is_empty() {
        if let Some(ssh_dir) = dirs::home_dir().map(|h| h.join(".ssh")) {
            for name in &["id_ed25519", "id_rsa", "id_ecdsa"] {
                let path = ssh_dir.join(name);
                if path.exists()
                    && session.userauth_pubkey_file(user, None, &path, passphrase).is_ok()
                    && session.authenticated()
                {
                    return Ok(format!("publickey-default({})", name));
                }
            }
        }
        return Err(TransferError::auth_failed(format!(
            "No key accepted for {} and no password given",
            user
        )));
    }

    // 4. Password, then keyboard-interactive
    if session.userauth_password(user, password).is_ok() && session.authenticated() {
        return Ok("password".to_string());
    }

    let mut prompt = PasswordPrompt {
        password: password.to_string(),
    };
    if session
        .userauth_keyboard_interactive(user, &mut prompt)
        .is_ok()
        && session.authenticated()
    {
        return Ok("keyboard-interactive".to_string());
    }

    Err(TransferError::auth_failed(format!(
        "No authentication method succeeded for {}",
        user
    )))
}
