//! Embedded single-page frontend.
//!
//! Served at `/` with no build step: one HTML document with inline CSS and
//! JS, talking to the REST API with `fetch`. Identity travels in the
//! `X-User` header; this page always uses the default user.

/// The complete frontend document.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>FocusFlow</title>
<style>
  :root {
    --bg: #0f1220;
    --panel: #181c2e;
    --panel-2: #1f2440;
    --text: #e8eaf6;
    --muted: #9aa0c3;
    --accent: #7c6df2;
    --ok: #4caf7d;
    --warn: #e0a85c;
    --high: #e05c7a;
    --medium: #e0a85c;
    --low: #5c9de0;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body {
    font-family: -apple-system, "Segoe UI", Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
    height: 100vh;
    display: flex;
    flex-direction: column;
  }
  header {
    display: flex;
    align-items: center;
    gap: 12px;
    padding: 14px 20px;
    background: var(--panel);
    border-bottom: 1px solid var(--panel-2);
  }
  header h1 { font-size: 18px; font-weight: 600; }
  .status { display: flex; align-items: center; gap: 6px; margin-left: auto; color: var(--muted); font-size: 13px; }
  .dot { width: 9px; height: 9px; border-radius: 50%; background: var(--warn); }
  .dot.ok { background: var(--ok); }
  main { flex: 1; display: flex; gap: 16px; padding: 16px 20px; min-height: 0; }
  .panel { background: var(--panel); border-radius: 10px; display: flex; flex-direction: column; min-height: 0; }
  .panel h2 { font-size: 14px; color: var(--muted); padding: 14px 16px 8px; text-transform: uppercase; letter-spacing: 0.06em; }

  /* chat */
  #chat { width: 360px; }
  #messages { flex: 1; overflow-y: auto; padding: 0 16px; display: flex; flex-direction: column; gap: 8px; }
  .msg { padding: 9px 12px; border-radius: 9px; font-size: 14px; line-height: 1.45; max-width: 90%; white-space: pre-wrap; }
  .msg.user { background: var(--accent); align-self: flex-end; }
  .msg.assistant { background: var(--panel-2); align-self: flex-start; }
  .composer { display: flex; gap: 8px; padding: 12px 16px; }
  input, textarea {
    flex: 1; background: var(--panel-2); border: 1px solid #2b3154; color: var(--text);
    border-radius: 8px; padding: 9px 11px; font-size: 14px; font-family: inherit; resize: none;
  }
  button {
    background: var(--accent); color: #fff; border: 0; border-radius: 8px;
    padding: 9px 16px; font-size: 14px; cursor: pointer;
  }
  button:disabled { opacity: 0.5; cursor: default; }

  /* schedule */
  #schedule { flex: 1; }
  .workflow { display: flex; gap: 8px; padding: 0 16px 12px; }
  #grid { flex: 1; display: grid; grid-template-columns: repeat(5, 1fr); gap: 10px; padding: 0 16px 16px; overflow-y: auto; }
  .day { background: var(--panel-2); border-radius: 8px; padding: 10px; }
  .day h3 { font-size: 13px; color: var(--muted); margin-bottom: 8px; }
  .block { border-radius: 7px; padding: 8px 9px; margin-bottom: 7px; font-size: 13px; background: #262c4d; border-left: 3px solid var(--medium); }
  .block.high { border-left-color: var(--high); }
  .block.low { border-left-color: var(--low); }
  .block .time { color: var(--muted); font-size: 12px; }
  .empty { color: var(--muted); font-size: 13px; padding: 0 16px 16px; }
</style>
</head>
<body>
<header>
  <h1>FocusFlow</h1>
  <div class="status"><span class="dot" id="ai-dot"></span><span id="ai-label">checking...</span></div>
</header>
<main>
  <section class="panel" id="chat">
    <h2>Assistant</h2>
    <div id="messages"></div>
    <div class="composer">
      <input id="chat-input" placeholder="Ask for study advice..." autocomplete="off">
      <button id="chat-send">Send</button>
    </div>
  </section>
  <section class="panel" id="schedule">
    <h2>Weekly schedule</h2>
    <div class="workflow">
      <input id="workflow-input" placeholder="e.g. study Math and Physics for finals in 2 weeks, mornings">
      <button id="generate">Generate</button>
    </div>
    <div class="empty" id="schedule-empty" hidden>No schedule yet. Describe your week above.</div>
    <div id="grid"></div>
  </section>
</main>
<script>
const DAYS = ['Monday', 'Tuesday', 'Wednesday', 'Thursday', 'Friday'];
const headers = { 'Content-Type': 'application/json', 'X-User': 'demo_user' };

const messages = document.getElementById('messages');
const chatInput = document.getElementById('chat-input');
const chatSend = document.getElementById('chat-send');
const workflowInput = document.getElementById('workflow-input');
const generateBtn = document.getElementById('generate');

function addMessage(role, content) {
  const div = document.createElement('div');
  div.className = 'msg ' + role;
  div.textContent = content;
  messages.appendChild(div);
  messages.scrollTop = messages.scrollHeight;
}

async function checkHealth() {
  try {
    const res = await fetch('/api/health');
    const body = await res.json();
    document.getElementById('ai-dot').classList.toggle('ok', body.ai_enabled);
    document.getElementById('ai-label').textContent =
      body.ai_enabled ? 'AI: ' + body.ai_provider : 'fallback mode';
  } catch {
    document.getElementById('ai-label').textContent = 'offline';
  }
}

async function loadHistory() {
  const res = await fetch('/api/chat/history', { headers });
  const body = await res.json();
  messages.innerHTML = '';
  for (const m of body.history) addMessage(m.role, m.content);
}

async function sendChat() {
  const message = chatInput.value.trim();
  if (!message) return;
  chatInput.value = '';
  addMessage('user', message);
  chatSend.disabled = true;
  try {
    const res = await fetch('/api/chat', {
      method: 'POST', headers, body: JSON.stringify({ message })
    });
    const body = await res.json();
    addMessage('assistant', res.ok ? body.response : (body.error || 'request failed'));
  } catch {
    addMessage('assistant', 'request failed');
  } finally {
    chatSend.disabled = false;
  }
}

async function loadSchedule() {
  const res = await fetch('/api/schedule', { headers });
  const body = await res.json();
  const grid = document.getElementById('grid');
  const empty = document.getElementById('schedule-empty');
  grid.innerHTML = '';
  if (!body.schedule_id) { empty.hidden = false; return; }
  empty.hidden = true;
  const byDay = [[], [], [], [], []];
  for (const b of body.blocks) byDay[b.day].push(b);
  DAYS.forEach((name, i) => {
    const col = document.createElement('div');
    col.className = 'day';
    const h = document.createElement('h3');
    h.textContent = name;
    col.appendChild(h);
    for (const b of byDay[i]) {
      const el = document.createElement('div');
      el.className = 'block ' + b.priority;
      const time = document.createElement('div');
      time.className = 'time';
      time.textContent = b.start_time + ' – ' + b.end_time;
      const subject = document.createElement('div');
      subject.textContent = b.subject + (b.topic ? ' · ' + b.topic : '');
      el.appendChild(time);
      el.appendChild(subject);
      col.appendChild(el);
    }
    grid.appendChild(col);
  });
}

async function generateSchedule() {
  const workflow = workflowInput.value.trim();
  if (!workflow) return;
  generateBtn.disabled = true;
  generateBtn.textContent = 'Generating...';
  try {
    const res = await fetch('/api/generate-schedule', {
      method: 'POST', headers, body: JSON.stringify({ workflow })
    });
    const body = await res.json();
    if (body.success) await loadSchedule();
    else addMessage('assistant', body.error || 'schedule generation failed');
  } finally {
    generateBtn.disabled = false;
    generateBtn.textContent = 'Generate';
  }
}

chatSend.addEventListener('click', sendChat);
chatInput.addEventListener('keydown', e => { if (e.key === 'Enter') sendChat(); });
generateBtn.addEventListener('click', generateSchedule);
workflowInput.addEventListener('keydown', e => { if (e.key === 'Enter') generateSchedule(); });

checkHealth();
setInterval(checkHealth, 30000);
loadHistory();
loadSchedule();
</script>
</body>
</html>
"##;
