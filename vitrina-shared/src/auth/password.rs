/// Password custody using Argon2id
///
/// This module owns every credential that exists in plaintext form: hashing
/// at account creation and password change, verification at login, and
/// generation of random initial credentials for self-signup clients.
///
/// # Security
///
/// - **Algorithm**: Argon2id (hybrid of Argon2i and Argon2d)
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Salt**: 16 random bytes per hash, so equal inputs hash differently
///
/// Hashing and verification are deliberately CPU-expensive. The async
/// wrappers ([`hash_async`], [`verify_async`]) run the work on the blocking
/// pool so a login burst never stalls the I/O-handling path.
///
/// # Example
///
/// ```
/// use vitrina_shared::auth::password::{hash, verify};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hashed = hash("Secret123")?;
/// assert!(verify("Secret123", &hashed));
/// assert!(!verify("wrong", &hashed));
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};
use rand::{distributions::Alphanumeric, Rng};

/// Error type for hashing operations
///
/// Hashing never fails for valid string input; this surfaces only on
/// parameter misconfiguration or a lost blocking task.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),
}

fn argon2() -> Result<Argon2<'static>, PasswordError> {
    let params = ParamsBuilder::new()
        .m_cost(65536) // 64 MB
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::Hash(format!("invalid parameters: {e}")))?;

    Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with a fresh random salt
///
/// Returns a PHC string (`$argon2id$v=19$m=65536,t=3,p=4$...`) embedding the
/// algorithm, parameters and salt, so verification needs no extra state.
pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(format!("hash generation failed: {e}")))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Returns `false` for a mismatch and for malformed hashes alike; callers
/// get a plain boolean and no error channel to leak detail through.
/// Comparison is constant-time inside the argon2 crate.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    // Parameters are embedded in the hash
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hashes on the blocking pool
pub async fn hash_async(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash(&password))
        .await
        .map_err(|e| PasswordError::Hash(format!("hashing task failed: {e}")))?
}

/// Verifies on the blocking pool; a lost task counts as a mismatch
pub async fn verify_async(password: String, stored_hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify(&password, &stored_hash))
        .await
        .unwrap_or(false)
}

/// Generates a random alphanumeric initial credential
///
/// Used for self-signup client accounts; the plaintext is mailed once and
/// only the hash is persisted.
pub fn generate_credential(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
