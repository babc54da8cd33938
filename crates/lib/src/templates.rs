//! Email templates: subject and HTML body per message type.
//!
//! Plain string substitution over predefined markup. One template for the
//! mid-call info email, one for the post-call follow-up. Branding strings
//! come from config so the bridge is deployable per tenant.

use crate::config::BrandingConfig;
use crate::resolver::ResolvedRecipient;

/// Shared header block (brand banner).
fn header(branding: &BrandingConfig) -> String {
    format!(
        r#"<div style="background: linear-gradient(135deg, #0077b6 0%, #00a8e8 100%); padding: 30px; border-radius: 12px 12px 0 0; text-align: center;">
    <h1 style="color: white; margin: 0; font-size: 24px;">{company}</h1>
    <p style="color: #caf0f8; margin: 10px 0 0 0; font-size: 14px;">Demo</p>
</div>"#,
        company = branding.company_name
    )
}

/// Shared footer block (address line).
fn footer(branding: &BrandingConfig) -> String {
    format!(
        r#"<div style="background: #1a365d; padding: 20px; border-radius: 0 0 12px 12px; text-align: center;">
    <p style="color: #a0aec0; margin: 0; font-size: 12px;">{company} | {address}</p>
</div>"#,
        company = branding.company_name,
        address = branding.address
    )
}

fn signature(branding: &BrandingConfig) -> String {
    format!(
        r#"<p style="margin-top: 30px;">
        Best,<br>
        <strong style="color: #0077b6;">{agent}</strong><br>
        <span style="color: #718096;">{company}</span>
    </p>"#,
        agent = branding.agent_name,
        company = branding.company_name
    )
}

/// Mid-call info email: plan details the caller asked for.
/// Returns (subject, html_body).
pub fn info_email(recipient: &ResolvedRecipient, branding: &BrandingConfig) -> (String, String) {
    let subject = format!(
        "Your {topic} - {company}",
        topic = recipient.topic,
        company = branding.company_name
    );
    let body = format!(
        r#"<html>
<body style="font-family: 'Segoe UI', Arial, sans-serif; line-height: 1.7; color: #2d3748; max-width: 650px; margin: 0 auto; padding: 20px;">
{header}
<div style="background: #ffffff; padding: 35px; border: 1px solid #e2e8f0; border-top: none;">
    <p style="font-size: 16px;">Hi {name},</p>
    <p>Thanks for your interest! Here's the info you requested about <strong>{topic}</strong>.</p>
    <div style="background: linear-gradient(135deg, #e0f7fa 0%, #f0f9ff 100%); border-left: 4px solid #0077b6; padding: 25px; margin: 25px 0; border-radius: 0 8px 8px 0;">
        <h2 style="color: #0077b6; margin: 0 0 15px 0; font-size: 20px;">Boca Youth+ Insurance Program</h2>
        <p style="margin: 0 0 10px 0;"><strong>Monthly Premium:</strong> <span style="color: #0077b6; font-size: 18px; font-weight: bold;">$200 less</span> than comparable plans</p>
        <p style="margin: 0;"><strong>Enrollment:</strong> Open now</p>
    </div>
    <h3 style="color: #1a365d; border-bottom: 2px solid #e2e8f0; padding-bottom: 10px;">Plan Terms</h3>
    <table style="width: 100%; border-collapse: collapse; margin: 20px 0;">
        <tr style="background: #f7fafc;">
            <td style="padding: 12px; border: 1px solid #e2e8f0;"><strong>Coverage</strong></td>
            <td style="padding: 12px; border: 1px solid #e2e8f0;">Comprehensive Health Insurance</td>
        </tr>
        <tr>
            <td style="padding: 12px; border: 1px solid #e2e8f0;"><strong>Deductible</strong></td>
            <td style="padding: 12px; border: 1px solid #e2e8f0;">$500 / $1,000 / $2,500</td>
        </tr>
        <tr style="background: #f7fafc;">
            <td style="padding: 12px; border: 1px solid #e2e8f0;"><strong>Primary Care Copay</strong></td>
            <td style="padding: 12px; border: 1px solid #e2e8f0;">$20</td>
        </tr>
        <tr>
            <td style="padding: 12px; border: 1px solid #e2e8f0;"><strong>Specialist Copay</strong></td>
            <td style="padding: 12px; border: 1px solid #e2e8f0;">$40</td>
        </tr>
        <tr style="background: #f7fafc;">
            <td style="padding: 12px; border: 1px solid #e2e8f0;"><strong>Rx Coverage</strong></td>
            <td style="padding: 12px; border: 1px solid #e2e8f0;">$10 / $35 / $70 (Tier 1/2/3)</td>
        </tr>
        <tr>
            <td style="padding: 12px; border: 1px solid #e2e8f0;"><strong>Out-of-Pocket Max</strong></td>
            <td style="padding: 12px; border: 1px solid #e2e8f0;">$6,500 individual / $13,000 family</td>
        </tr>
        <tr style="background: #f7fafc;">
            <td style="padding: 12px; border: 1px solid #e2e8f0;"><strong>Network</strong></td>
            <td style="padding: 12px; border: 1px solid #e2e8f0;">PPO - 500,000+ providers</td>
        </tr>
    </table>
    <h3 style="color: #1a365d; border-bottom: 2px solid #e2e8f0; padding-bottom: 10px;">What's Included</h3>
    <ul style="padding-left: 20px;">
        <li style="margin-bottom: 8px;">Preventive care at 100%</li>
        <li style="margin-bottom: 8px;">Telehealth visits</li>
        <li style="margin-bottom: 8px;">Mental health support</li>
        <li style="margin-bottom: 8px;">Worldwide ER coverage</li>
        <li style="margin-bottom: 8px;">No specialist referrals needed</li>
        <li style="margin-bottom: 8px;">24/7 nurse hotline</li>
    </ul>
    <p>Questions? Just reply to this email or give us a call.</p>
    {signature}
</div>
{footer}
</body>
</html>"#,
        header = header(branding),
        name = recipient.name,
        topic = recipient.topic,
        signature = signature(branding),
        footer = footer(branding)
    );
    (subject, body)
}

/// Post-call follow-up email: recap and next steps.
/// Returns (subject, html_body).
pub fn follow_up_email(branding: &BrandingConfig) -> (String, String) {
    let subject = format!("Your Next Steps - {}", branding.company_name);
    let body = format!(
        r#"<html>
<body style="font-family: 'Segoe UI', Arial, sans-serif; line-height: 1.7; color: #2d3748; max-width: 650px; margin: 0 auto; padding: 20px;">
{header}
<div style="background: #ffffff; padding: 35px; border: 1px solid #e2e8f0; border-top: none;">
    <h2 style="color: #0077b6; margin-top: 0;">Thanks for chatting with {agent}!</h2>
    <p>Great talking with you. Here's a quick recap of the <strong>Boca Youth+ Insurance Program</strong> and what to do next.</p>
    <div style="background: linear-gradient(135deg, #e0f7fa 0%, #f0f9ff 100%); padding: 25px; margin: 25px 0; border-radius: 12px;">
        <h3 style="color: #0077b6; margin: 0 0 20px 0;">Next Steps</h3>
        <div style="margin-bottom: 15px;">
            <strong style="color: #1a365d;">1. Review Your Current Policy</strong><br>
            <span style="color: #4a5568; font-size: 14px;">Check your premium, coverage, and renewal date.</span>
        </div>
        <div style="margin-bottom: 15px;">
            <strong style="color: #1a365d;">2. Compare Options</strong><br>
            <span style="color: #4a5568; font-size: 14px;">You could save $200/month with Boca Youth+.</span>
        </div>
        <div>
            <strong style="color: #1a365d;">3. Schedule Enrollment</strong><br>
            <span style="color: #4a5568; font-size: 14px;">Reply to this email or call us to get started.</span>
        </div>
    </div>
    <div style="background: #fff5f5; border: 1px solid #fc8181; padding: 20px; border-radius: 8px; margin: 25px 0;">
        <p style="margin: 0; color: #c53030;"><strong>Don't wait!</strong> Lock in your rate before premiums go up.</p>
    </div>
    <div style="background: #f7fafc; padding: 20px; border-radius: 8px; text-align: center; margin: 25px 0;">
        <p style="margin: 0;"><strong>Questions?</strong> Reply here or call <strong>{phone}</strong></p>
    </div>
    {signature}
</div>
{footer}
</body>
</html>"#,
        header = header(branding),
        agent = branding.agent_name,
        phone = branding.phone,
        signature = signature(branding),
        footer = footer(branding)
    );
    (subject, body)
}
