//! WeCom (WeChat Work) social login provider: build authorization redirects, exchange codes for
//! employee or contact identities, and normalize vendor profiles into generic users.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod provider;
pub mod user;
pub mod wecom;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests that talk to `httpmock` servers.

	pub use crate::_prelude::*;

	// self
	use crate::{config::WeComConfig, http::ReqwestHttpClient, wecom::ReqwestWeCom};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Points the config's vendor API base at `api_base` (usually a mock server URL) and
	/// constructs a reqwest-backed provider around the insecure test client.
	pub fn build_reqwest_test_wecom(mut config: WeComConfig, api_base: &str) -> ReqwestWeCom {
		config.endpoints.api_base =
			Some(Url::parse(api_base).expect("Mock API base URL should parse successfully."));

		ReqwestWeCom::with_http_client(
			config,
			test_reqwest_http_client(),
			crate::api::ReqwestTransportErrorMapper,
		)
		.expect("Test provider should build successfully.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
