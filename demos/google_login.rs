//! Prints the Google consent URL, then completes the login for a callback URL.
//!
//! ```text
//! cargo run --example google_login -- <client-id> <client-secret>
//! cargo run --example google_login -- <client-id> <client-secret> '<callback-url>'
//! ```

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use oauth2_login::{flows::OAuthLogin, provider::presets, url::Url};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = env::args().skip(1);
	let client_id = args.next().ok_or_else(|| eyre!("Missing <client-id> argument."))?;
	let client_secret = args.next().ok_or_else(|| eyre!("Missing <client-secret> argument."))?;
	let login = OAuthLogin::new(
		presets::google().build()?,
		client_id,
		client_secret,
		Url::parse("http://localhost:8080/account")?,
	)?;

	println!("Send your user to {}.", login.authorization_url(Some("demo-state")));

	let Some(callback) = args.next() else {
		println!("Re-run with the callback URL Google redirected to.");

		return Ok(());
	};
	let callback = Url::parse(&callback)?;

	if callback.query_pairs().any(|(key, value)| key == "state" && value != "demo-state") {
		return Err(eyre!("Callback `state` does not match the one sent."));
	}

	let identity = login.enter(&callback).await?;

	println!("Logged in as {}.", identity.urn());

	for (key, value) in identity.properties() {
		println!("  {key} = {value}");
	}

	Ok(())
}
