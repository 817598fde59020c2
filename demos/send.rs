//! End-to-end tour of the client.
//!
//! ```text
//! ZEPTOMAIL_API_KEY=... ZEPTOMAIL_OAUTH_TOKEN=... ZEPTOMAIL_MAIL_AGENT=... \
//!     RUST_LOG=zeptomail_client=debug cargo run --example send -- you@example.com
//! ```

use std::time::Duration;
use tracing_subscriber::EnvFilter;
use zeptomail_client::{
    Attachment, CreateTemplateRequest, EmailAddress, EmailClient, EmailRequest, Error,
    ListTemplatesParams, TemplateRequest, TemplatesClient,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let recipient = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "recipient@example.com".to_string());
    let sender = EmailAddress::new("noreply@example.com").with_name("Demo");

    let email = EmailClient::builder()
        .timeout(Some(Duration::from_secs(60)))
        .build_email_client(std::env::var("ZEPTOMAIL_API_KEY").unwrap_or_default())?;

    let uploaded = email
        .file_cache_upload("hello.txt", b"Hello World".to_vec())
        .await?;
    println!("Uploaded: {}", uploaded.file_cache_key);

    let request = EmailRequest::new(sender.clone(), "Hello from zeptomail-client")
        .to(EmailAddress::new(recipient.as_str()))
        .html_body("<h1>Hello!</h1>")
        .attachment(Attachment::from_cache_key(uploaded.file_cache_key));

    match email.send_email(&request).await {
        Ok(response) => println!("Sent: {} ({})", response.message, response.request_id),
        Err(Error::Api(err)) => {
            println!("API error {}: {} - {}", err.http_status, err.code, err.message);
            for detail in &err.details {
                println!("  {}: {} ({})", detail.target, detail.message, detail.code);
            }
            return Ok(());
        }
        Err(err) => return Err(err),
    }

    let templates = TemplatesClient::from_env()?;
    let agent = std::env::var("ZEPTOMAIL_MAIL_AGENT").unwrap_or_else(|_| "mail-agent".to_string());

    let created = templates
        .create_template(
            &agent,
            &CreateTemplateRequest {
                template_name: "Demo welcome".to_string(),
                subject: "Welcome, {{name}}".to_string(),
                htmlbody: Some("<p>Hi {{name}}</p>".to_string()),
                ..Default::default()
            },
        )
        .await?;

    let Some(template) = created.data.first() else {
        println!("Template created but no data returned");
        return Ok(());
    };
    println!("Created template {}", template.template_key);

    let templated = TemplateRequest::with_key(&template.template_key, sender)
        .to(EmailAddress::new(recipient.as_str()))
        .merge("name", "friend");
    email.send_template_email(&templated).await?;

    let page = templates
        .list_templates(&agent, ListTemplatesParams::default())
        .await?;
    for item in &page.data {
        println!("{} - {}", item.template_key, item.template_name);
    }

    templates
        .delete_template(&agent, &template.template_key)
        .await?;
    println!("Deleted template {}", template.template_key);

    Ok(())
}
