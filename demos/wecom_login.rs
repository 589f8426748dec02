//! Demonstrates both WeCom login redirects and a detailed code exchange against a local mock of
//! the vendor API.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use socialite_wecom::{
	api::ReqwestTransportErrorMapper,
	config::WeComConfig,
	http::ReqwestHttpClient,
	reqwest::Client,
	wecom::{ReqwestWeCom, WeCom},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/gettoken");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"ok\",\"access_token\":\"demo-token\",\"expires_in\":7200}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/user/getuserinfo").query_param("code", "demo-code");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"ok\",\"UserId\":\"zhangsan\",\"DeviceId\":\"dev-1\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/cgi-bin/user/get").query_param("userid", "zhangsan");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"userid\":\"zhangsan\",\"name\":\"Zhang San\",\"department\":[1],\"position\":\"Engineer\",\"status\":1}",
			);
		})
		.await;

	let redirect_url = Url::parse("https://app.example.com/auth/wecom/callback")?;
	let scoped = WeComConfig::builder("ww-demo-app", redirect_url.clone())
		.scopes(["snsapi_base", "snsapi_privateinfo"])
		.build()?;
	let redirect = ReqwestWeCom::new(scoped)?.authorize()?;

	println!("Scoped login ({}): {}", redirect.kind, redirect.authorize_url);

	let desktop = WeComConfig::builder("ww-demo-app", redirect_url)
		.agent_id(1000002)
		.corp_credentials("ww-demo-corp", "demo-corp-secret")
		.api_base(Url::parse(&server.base_url())?)
		.build()?;
	let qr = ReqwestWeCom::new(desktop.clone())?.authorize()?;

	println!("QR login ({}): {}", qr.kind, qr.authorize_url);

	// The callback hands back `code` and `state`; check the state before exchanging.
	qr.validate_state(&qr.state)?;

	let http_client = ReqwestHttpClient::with_client(Client::builder().build()?);
	let mut provider = <WeCom<ReqwestHttpClient, ReqwestTransportErrorMapper>>::with_http_client(
		desktop,
		http_client,
		ReqwestTransportErrorMapper,
	)?
	.detailed();
	let user = provider.user_from_code("demo-code").await?;

	println!("Resolved {} via {}:", user.attribute_str("name"), user.provider());

	for (key, value) in user.attributes() {
		println!("  {key} = {value}");
	}

	Ok(())
}
