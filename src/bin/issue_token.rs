//! src/bin/issue_token.rs
//!
//! Mints a login token for local use when no external identity provider is
//! wired in: `issue-token <user_id> [name] [email]`.

use ai_assessment::config::Config;
use ai_assessment::models::caller::Caller;
use ai_assessment::utils::jwt::sign_jwt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let mut args = std::env::args().skip(1);
    let user_id = args
        .next()
        .ok_or("usage: issue-token <user_id> [name] [email]")?
        .parse::<i64>()?;
    if user_id <= 0 {
        return Err("user_id must be positive".into());
    }

    let caller = Caller {
        user_id,
        name: args.next().unwrap_or_default(),
        email: args.next().unwrap_or_default(),
    };

    let token = sign_jwt(&caller, &config.jwt_secret, config.jwt_expiration)?;
    println!("{}", token);
    Ok(())
}
