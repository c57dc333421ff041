use crate::player::{CONTROLS_IDLE, PLAYBACK_RATES};

/// Page hosting the media element for whichever video is open in the player.
/// It forwards media events and keys to the player API and mirrors the returned view.
pub fn render() -> String {
    let rates = PLAYBACK_RATES
        .iter()
        .map(|r| format!("<option value='{r}'>{r}x</option>"))
        .collect::<Vec<_>>()
        .join("");
    let idle_ms = CONTROLS_IDLE.as_millis();

    format!(
    r#"<!DOCTYPE html>
<html>
<head>
  <meta charset='utf-8'/>
  <title>EduCraft Player</title>
  <meta http-equiv="Content-Security-Policy"
        content="default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; media-src 'self' blob: https:; connect-src 'self';" />
  <style>
    html,body{{height:100%;width:100%;margin:0;padding:0;background:#000;color:#fff;font-family:sans-serif}}
    video{{width:100%;height:calc(100% - 48px)}}
    .bar{{position:fixed;left:0;right:0;bottom:0;height:48px;background:rgba(0,0,0,.7);display:flex;align-items:center;gap:8px;padding:0 8px;transition:opacity .3s}}
    .bar.hidden{{opacity:0}}
    #subtitle{{position:fixed;bottom:64px;width:100%;text-align:center}}
  </style>
</head>
<body>
<video id='media' preload='metadata'></video>
<div id='subtitle'></div>
<div class='bar' id='bar'>
  <button id='play'>Play</button>
  <span id='time'>0:00 / 0:00</span>
  <input id='progress' type='range' min='0' max='1000' value='0'/>
  <button id='mute'>Mute</button>
  <input id='volume' type='range' min='0' max='1' step='0.05' value='1'/>
  <select id='rate'>{rates}</select>
  <button id='cc'>CC</button>
  <button id='fs'>Fullscreen</button>
</div>
<script>
(function(){{
  const media = document.getElementById('media');
  const $ = (id) => document.getElementById(id);

  async function send(path, body){{
    const res = await fetch(`/api/player/${{path}}`, {{
      method:'POST',
      headers:{{'content-type':'application/json'}},
      body: JSON.stringify(body||{{}})
    }});
    const view = await res.json().catch(()=>null);
    if (res.ok && view) apply(view);
    return view;
  }}
  const command = (c) => send('command', c);

  function apply(v){{
    if (media.getAttribute('src') !== v.src) media.src = v.src;
    if (v.playing && media.paused) media.play().catch(()=>{{}});
    if (!v.playing && !media.paused) media.pause();
    if (Math.abs(media.currentTime - v.current_time) > 0.5) media.currentTime = v.current_time;
    media.volume = v.effective_volume;
    media.playbackRate = v.rate;
    if (v.fullscreen && !document.fullscreenElement) media.requestFullscreen().catch(()=>command({{command:'toggle_fullscreen'}}));
    if (!v.fullscreen && document.fullscreenElement) document.exitFullscreen();
    $('play').textContent = v.playing ? 'Pause' : 'Play';
    $('mute').textContent = v.muted ? 'Unmute' : 'Mute';
    $('time').textContent = `${{v.elapsed}} / ${{v.total}}`;
    $('progress').value = Math.round(v.progress * 10);
    $('volume').value = v.volume;
    $('rate').value = String(v.rate);
    $('subtitle').textContent = v.subtitle || '';
    $('bar').classList.toggle('hidden', !v.controls_visible);
    document.title = v.title;
  }}

  media.addEventListener('loadedmetadata', () => command({{command:'loaded', duration: media.duration}}));
  media.addEventListener('timeupdate', () => command({{command:'time_update', time: media.currentTime}}));
  $('play').onclick = () => command({{command:'toggle_play'}});
  $('mute').onclick = () => command({{command:'toggle_mute'}});
  $('cc').onclick = () => command({{command:'toggle_subtitles'}});
  $('fs').onclick = () => command({{command:'toggle_fullscreen'}});
  $('volume').oninput = (e) => command({{command:'set_volume', volume: Number(e.target.value)}});
  $('rate').onchange = (e) => command({{command:'set_rate', rate: Number(e.target.value)}});
  $('progress').onchange = (e) => command({{command:'seek_fraction', fraction: Number(e.target.value) / 1000}});

  document.addEventListener('keydown', (e) => {{
    if (e.target.tagName.toLowerCase() === 'input') return;
    if ([' ','ArrowLeft','ArrowRight','ArrowUp','ArrowDown','f','m'].includes(e.key)) e.preventDefault();
    send('key', {{key: e.key}});
  }});
  document.addEventListener('mousemove', () => {{
    command({{command:'pointer_moved'}});
    setTimeout(() => fetch('/api/player').then(r => r.json()).then(apply).catch(()=>{{}}), {idle_ms} + 50);
  }});

  fetch('/api/player').then(r => r.ok ? r.json() : null).then(v => {{
    if (v) apply(v); else document.body.textContent = 'No video is open.';
  }});
}})();
</script>
</body>
</html>"#,
        rates = rates,
        idle_ms = idle_ms
    )
}
