/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength rules
/// - [`jwt`]: HS256 session token generation and validation
/// - [`middleware`]: Session cookie handling and the Axum auth middleware
///
/// # Example
///
/// ```
/// use todoback_shared::auth::jwt::{create_token, validate_token, Claims};
/// use todoback_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("p@ssW0rd1")?;
/// assert!(verify_password("p@ssW0rd1", &hash)?);
///
/// let secret = "a-signing-secret-of-at-least-32-bytes!!";
/// let token = create_token(&Claims::new(Uuid::new_v4()), secret)?;
/// assert!(validate_token(&token, secret).is_ok());
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
