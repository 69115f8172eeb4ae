//! Static page templates. Placeholders are filled by `template::render`.

/// Status page for `/version`.
pub const VERSION_HTML: &str = r##"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1.0"><meta content="{branding}" property="og:title"/><meta content="{branding}" property="og:site_name"/><meta content="#1E98F0" name="theme-color"/><meta content="Release: {release}

Stats for nerds:
🕵️ {ua}
🌐 {ip}
🌎 {city}, {region}, {country}
Edge Connection:
{httpversion} 🔒 {tlsversion} ➡ {edge}
" property="og:description"/><title>{branding}</title><style>body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; padding: 0 20px; } h1 { font-size: 4em; font-weight: 900; margin-bottom: 0; } h2 { white-space: pre-wrap; } p { font-size: 10px; opacity: 0.3; }</style></head><body><h1>{branding}</h1><h2>Release: {release}</h2><br><h3>Stats for nerds:</h3><h2>Edge Connection:
{httpversion} 🔒 {tlsversion} ➡ {edge}</h2><h2>Client:
{ip} ({city}, {region}, {country})</h2><h2>User Agent:
{ua}</h2></body></html>"##;

/// Body of the fixed 500 response.
pub const ERROR_HTML: &str = r##"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1.0"><meta content="{branding}" property="og:title"/><meta content="Owie, you crashed {branding} :(
This is caused by upstream downtime or a new bug. Try again in a little while." property="og:description"/><title>:(</title><style>body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; padding: 0 20px; } h1 { font-size: 4em; font-weight: 900; margin-bottom: 0; } p { font-size: 10px; opacity: 0.3; }</style></head><body><h1>Owie :(</h1><h2>You hit a snag that broke {branding}. It's not your fault though. This is usually caused by an upstream outage or a new bug.</h2><p>{release}</p></body></html>"##;
