use relweb_common::Category;
use relweb_core::likes::LIKE_FAILED_NOTICE;

use crate::StoryView;

/// Render the landing page: hero, story gallery, submission and contact forms.
pub fn render_home(stories: &[StoryView], active: Option<Category>, site_key: Option<&str>) -> String {
    let hero = r##"<section class="hero">
    <h1>Putting the <span class="accent">'we'</span> back in the web</h1>
    <p>Imagine a web that connects us not just to information, but to each other, based on shared interests, locations, and moments of serendipity.</p>
    <div class="hero-actions"><a href="#stories" class="btn">Explore Stories</a><a href="#submit" class="btn btn-outline">Submit Your Vision</a></div>
</section>"##;

    let content = format!(
        "{hero}{gallery}{submit}{contact}",
        gallery = render_gallery(stories, active),
        submit = render_submit_form(),
        contact = render_contact_form(),
    );

    build_page("Stories from the Relational Web", &content, site_key)
}

fn render_gallery(stories: &[StoryView], active: Option<Category>) -> String {
    let mut filters = String::new();
    let all_class = if active.is_none() { "filter active" } else { "filter" };
    filters.push_str(&format!(r##"<a class="{all_class}" href="/#stories">All Stories</a>"##));
    for category in Category::ALL {
        let class = if active == Some(category) { "filter active" } else { "filter" };
        filters.push_str(&format!(
            r##"<a class="{class}" href="/?category={slug}#stories">{label}</a>"##,
            slug = category.as_str(),
            label = category.label(),
        ));
    }

    let mut cards = String::new();
    if stories.is_empty() {
        cards.push_str(r#"<p class="empty">No stories in this category yet. Be the first to share one.</p>"#);
    }
    for story in stories {
        cards.push_str(&render_card(story));
    }

    format!(
        r#"<section id="stories" class="container">
    <h2>Stories from the Relational Web</h2>
    <p class="lede">Explore vignettes from a future where the internet connects us in meaningful, local, and serendipitous ways.</p>
    <div class="filters">{filters}</div>
    <div class="grid">{cards}</div>
</section>"#
    )
}

fn render_card(story: &StoryView) -> String {
    let liked = if story.liked_by_viewer { " liked" } else { "" };
    format!(
        r#"<div class="card" data-id="{id}">
    <span class="badge badge-{slug}">{label}</span>
    <h3>{title}</h3>
    <p>{description}</p>
    <div class="card-footer">
        <button class="like{liked}" data-id="{id}" onclick="toggleLike(this)">&#9829; <span class="count">{likes}</span></button>
        <button class="remix" data-id="{id}" onclick="remix(this)">Remix</button>
    </div>
</div>"#,
        id = html_escape(&story.id),
        slug = story.category,
        label = story.category_label,
        title = html_escape(&story.title),
        description = html_escape(&story.description),
        likes = story.likes,
    )
}

fn render_submit_form() -> String {
    let options: String = Category::ALL
        .iter()
        .map(|c| format!(r#"<option value="{}">{}</option>"#, c.as_str(), c.label()))
        .collect();

    format!(
        r#"<section id="submit" class="container narrow">
    <h2>Submit Your Vision</h2>
    <p class="lede">Have an idea for how the relational web could transform human connection? Share your story with us.</p>
    <form id="story-form" onsubmit="return submitForm(event, '/api/submissions', 'story_submission')">
        <label>Story Title<input name="title" placeholder="Give your story a catchy title"></label>
        <label>Category<select name="category"><option value="">Select a category</option>{options}</select></label>
        <label>Your Story<textarea name="description" placeholder="Describe a moment of connection in the relational web..."></textarea></label>
        <label>Name (optional)<input name="name"></label>
        <label>Email (optional)<input name="email" type="email"></label>
        <button type="submit" class="btn">Submit Your Story</button>
    </form>
</section>"#
    )
}

fn render_contact_form() -> String {
    r#"<section id="contact" class="container narrow">
    <h2>Join the Community</h2>
    <p class="lede">We're building an open-source community to create a more relational web. Connect with others who share this vision and help us make it a reality.</p>
    <form id="contact-form" onsubmit="return submitForm(event, '/api/contact', 'contact')">
        <label>Name<input name="name"></label>
        <label>Email<input name="email" type="email"></label>
        <label>Message<textarea name="message" placeholder="How would you like to contribute?"></textarea></label>
        <button type="submit" class="btn">Send Message</button>
    </form>
</section>"#
        .to_string()
}

// --- Helpers ---

fn build_page(title: &str, content: &str, site_key: Option<&str>) -> String {
    let recaptcha_script = match site_key {
        Some(key) => format!(
            r#"<script src="https://www.google.com/recaptcha/api.js?render={key}"></script>"#,
            key = html_escape(key)
        ),
        None => String::new(),
    };
    let site_key_js = script_literal(&site_key);
    let like_failed = script_literal(&LIKE_FAILED_NOTICE);

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Relational Web</title>
{recaptcha_script}
<style>
*{{margin:0;padding:0;box-sizing:border-box;}}
body{{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;color:#1f2937;background:#fffbeb;}}
.header{{background:#fff;padding:12px 24px;display:flex;align-items:center;justify-content:space-between;border-bottom:1px solid #fde68a;position:sticky;top:0;}}
.header h1{{font-size:18px;font-weight:700;color:#1e3a5f;}}
.header nav a{{color:#4b5563;text-decoration:none;margin-left:20px;font-size:14px;}}
.container{{max-width:1080px;margin:0 auto;padding:48px 24px;}}
.narrow{{max-width:640px;}}
h2{{font-size:30px;text-align:center;margin-bottom:8px;}}
.lede{{text-align:center;color:#6b7280;margin-bottom:28px;}}
.hero{{text-align:center;padding:96px 24px 64px;}}
.hero h1{{font-size:44px;margin-bottom:16px;}}
.hero p{{max-width:640px;margin:0 auto 24px;color:#4b5563;}}
.accent{{color:#d97706;}}
.btn{{display:inline-block;padding:10px 20px;background:#f59e0b;color:#fff;border:none;border-radius:6px;text-decoration:none;font-size:15px;cursor:pointer;margin:4px;}}
.btn-outline{{background:transparent;color:#b45309;border:1px solid #fcd34d;}}
.filters{{display:flex;flex-wrap:wrap;justify-content:center;gap:8px;margin-bottom:28px;}}
.filter{{padding:4px 12px;border:1px solid #fcd34d;border-radius:6px;color:#b45309;text-decoration:none;font-size:13px;}}
.filter.active{{background:#f59e0b;color:#fff;}}
.grid{{display:grid;grid-template-columns:repeat(auto-fill,minmax(300px,1fr));gap:20px;}}
.card{{background:#fff;border:1px solid #f3f4f6;border-radius:10px;padding:20px;display:flex;flex-direction:column;}}
.card h3{{font-size:19px;margin:10px 0 6px;color:#1e3a5f;}}
.card p{{color:#4b5563;flex-grow:1;}}
.card-footer{{display:flex;justify-content:space-between;margin-top:16px;padding-top:10px;border-top:1px solid #f3f4f6;}}
.card-footer button{{background:none;border:none;cursor:pointer;font-size:14px;color:#6b7280;}}
.like.liked{{color:#db2777;}}
.remix{{color:#0f766e !important;}}
.badge{{display:inline-block;padding:2px 8px;border-radius:12px;font-size:11px;font-weight:600;}}
.badge-learning{{background:#dbeafe;color:#1e40af;}}
.badge-community{{background:#dcfce7;color:#166534;}}
.badge-collaboration{{background:#f3e8ff;color:#6b21a8;}}
.badge-discovery{{background:#fef3c7;color:#92400e;}}
.badge-creativity{{background:#ffe4e6;color:#9f1239;}}
.badge-abundance{{background:#d1fae5;color:#065f46;}}
.badge-care{{background:#e0f2fe;color:#075985;}}
.badge-ai{{background:#ede9fe;color:#5b21b6;}}
.empty{{color:#888;text-align:center;padding:40px;grid-column:1/-1;}}
form label{{display:block;font-size:14px;font-weight:500;margin-bottom:14px;}}
form input,form select,form textarea{{display:block;width:100%;margin-top:4px;padding:8px;border:1px solid #d1d5db;border-radius:6px;font:inherit;}}
form textarea{{min-height:120px;}}
#toasts{{position:fixed;bottom:20px;right:20px;display:flex;flex-direction:column;gap:8px;}}
.toast{{padding:10px 16px;border-radius:6px;color:#fff;font-size:14px;box-shadow:0 2px 8px rgba(0,0,0,.15);}}
.toast-success{{background:#16a34a;}}
.toast-error{{background:#dc2626;}}
.footer{{text-align:center;padding:32px;color:#6b7280;font-size:13px;border-top:1px solid #fde68a;}}
</style>
</head>
<body>
<div class="header">
    <h1>Relational Web</h1>
    <nav><a href="#stories">Stories</a><a href="#submit">Submit</a><a href="#contact">Contact</a></nav>
</div>
{content}
<div class="footer">Relational Web Project. Connecting people in meaningful ways.</div>
<div id="toasts"></div>
<script>
const SITE_KEY = {site_key_js};

function toast(notice) {{
    const el = document.createElement('div');
    el.className = 'toast toast-' + notice.kind;
    el.textContent = notice.message;
    document.getElementById('toasts').appendChild(el);
    setTimeout(() => el.remove(), 4000);
}}

function showNotices(body) {{
    (body.notices || []).forEach(toast);
}}

async function postJson(url, payload) {{
    const resp = await fetch(url, {{
        method: 'POST',
        headers: {{ 'Content-Type': 'application/json' }},
        body: JSON.stringify(payload || {{}}),
        credentials: 'same-origin',
    }});
    const body = await resp.json().catch(() => ({{}}));
    showNotices(body);
    return {{ ok: resp.ok, body }};
}}

async function toggleLike(button) {{
    const count = button.querySelector('.count');
    const wasLiked = button.classList.contains('liked');
    const before = Number(count.textContent) || 0;
    // Show the new state right away; the reply confirms or reverts it.
    button.classList.toggle('liked', !wasLiked);
    count.textContent = wasLiked ? Math.max(0, before - 1) : before + 1;

    let body = {{}};
    try {{
        ({{ body }} = await postJson('/api/stories/' + encodeURIComponent(button.dataset.id) + '/like'));
    }} catch (err) {{
        toast({{ kind: 'error', message: {like_failed} }});
    }}
    if (body.story) {{
        button.classList.toggle('liked', body.story.liked_by_viewer);
        count.textContent = body.story.likes;
    }} else {{
        button.classList.toggle('liked', wasLiked);
        count.textContent = before;
    }}
}}

async function remix(button) {{
    const text = window.prompt('Suggest an improvement or variation to this vision of the relational web.');
    if (text === null) return;
    await postJson('/api/stories/' + encodeURIComponent(button.dataset.id) + '/remix', {{ remix_text: text }});
}}

async function challengeToken(action) {{
    if (!SITE_KEY || !window.grecaptcha) return 'unverified';
    await new Promise(resolve => grecaptcha.ready(resolve));
    return grecaptcha.execute(SITE_KEY, {{ action }});
}}

async function submitForm(event, url, action) {{
    event.preventDefault();
    const form = event.target;
    const payload = Object.fromEntries(new FormData(form).entries());
    payload.token = await challengeToken(action);
    const {{ ok }} = await postJson(url, payload);
    if (ok) form.reset();
    return false;
}}
</script>
</body>
</html>"##,
        title = html_escape(title),
    )
}

/// JSON literal safe to inline in a `<script>` block.
fn script_literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
