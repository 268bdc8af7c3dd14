//! HTML pages served by the front end.

use threadsim_core::SessionId;

/// Categories offered on the submission form, as `(value, label)`.
pub const CATEGORIES: &[(&str, &str)] = &[
    ("aita", "r/AmITheAsshole"),
    ("relationships", "r/relationships"),
    ("legaladvice", "r/legaladvice"),
    ("askreddit", "r/AskReddit"),
];

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ThreadSim</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 min-h-screen">
{{body}}
</body>
</html>
"#;

const HOME_BODY: &str = r#"<main class="max-w-2xl mx-auto p-8 space-y-6">
    <h1 class="text-3xl font-bold">ThreadSim</h1>
    <p class="text-gray-700">Describe a problem and watch a simulated community argue about it.</p>
    <a href="/new" class="inline-block bg-blue-600 text-white px-4 py-2 rounded">Start a thread</a>
</main>"#;

const NEW_BODY: &str = r#"<main class="max-w-2xl mx-auto p-8 space-y-6">
    <h1 class="text-2xl font-bold">ThreadSim</h1>
    <form method="POST" action="/start">
        <div class="mb-4">
            <label for="prompt" class="block font-medium mb-1">Your problem</label>
            <textarea id="prompt" name="prompt" rows="6" class="w-full border rounded p-2"></textarea>
        </div>
        <div class="mb-4">
            <label for="category" class="block font-medium mb-1">Simulated community</label>
            <select id="category" name="category" class="w-full border rounded p-2">
{{options}}
            </select>
        </div>
        <button type="submit" class="bg-blue-600 text-white px-4 py-2 rounded">Simulate responses</button>
    </form>
</main>"#;

const SESSION_BODY: &str = r#"<div class="max-w-2xl mx-auto p-6 space-y-6">
    <h1 class="text-2xl font-bold">Your simulated thread</h1>
    <div class="bg-gray-100 p-4 rounded">
        <h2 class="font-semibold text-lg">Your post</h2>
        <p class="mt-2 whitespace-pre-wrap text-gray-800">{{prompt}}</p>
    </div>
    <div id="responseArea">
        <p id="status" class="text-gray-500 italic">Generating simulated responses...</p>
    </div>
</div>
<script>
    const scheme = window.location.protocol === "https:" ? "wss://" : "ws://";
    const ws = new WebSocket(scheme + window.location.host + "/ws?id={{id}}");
    const responseArea = document.getElementById("responseArea");

    ws.onmessage = (event) => {
        const data = JSON.parse(event.data);

        if (data.type === "comment") {
            const container = document.createElement("div");
            container.id = "comment-" + data.parentIndex;
            container.innerHTML = data.html;
            responseArea.appendChild(container);
        } else if (data.type === "reply") {
            const container = document.getElementById("comment-" + data.parentIndex);
            if (!container) {
                console.warn("No container for comment", data.parentIndex);
                return;
            }
            const reply = document.createElement("div");
            reply.innerHTML = data.html;
            container.appendChild(reply);
        } else if (data.type === "done") {
            document.getElementById("status").remove();
            const p = document.createElement("p");
            p.className = "text-gray-500";
            p.innerText = "Simulation complete.";
            responseArea.appendChild(p);
            ws.close();
        }
    };
</script>"#;

fn layout(body: &str) -> String {
    LAYOUT.replace("{{body}}", body)
}

pub fn home() -> String {
    layout(HOME_BODY)
}

pub fn new_thread() -> String {
    let options = CATEGORIES
        .iter()
        .map(|(value, label)| format!(r#"                <option value="{value}">{label}</option>"#))
        .collect::<Vec<_>>()
        .join("\n");
    layout(&NEW_BODY.replace("{{options}}", &options))
}

/// Thread page for a session; the prompt is escaped before insertion.
pub fn session(id: SessionId, prompt: &str) -> String {
    let body = SESSION_BODY
        .replace("{{id}}", &id.to_string())
        .replace("{{prompt}}", &html_escape::encode_text(prompt));
    layout(&body)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_new_thread_lists_categories() {
        let page = new_thread();
        for (value, _) in CATEGORIES {
            assert!(page.contains(&format!(r#"value="{value}""#)));
        }
        assert!(page.contains(r#"action="/start""#));
    }

    #[test]
    fn test_session_page_escapes_prompt() {
        let id = Uuid::new_v4();
        let page = session(id, "<script>alert(1)</script> & more");
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
        assert!(page.contains(&format!("/ws?id={id}")));
        assert!(!page.contains("{{"));
    }
}
