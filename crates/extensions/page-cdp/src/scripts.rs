//! Page-side functions run through `Runtime.callFunctionOn`.
//!
//! Element functions bind `this` to the element and return `false` (or
//! `null` where a value is expected) when it has left the document.

/// Plain-data description of an element, or of every entry when `this`
/// is an array of elements. `id` comes from a page-side weak map, so the
/// same node gets the same id for as long as the document lives.
pub const DESCRIBE: &str = r#"function() {
  const registry = window.__pagevoiceNodes || (window.__pagevoiceNodes = { ids: new WeakMap(), next: 1 });
  const idOf = (el) => {
    let id = registry.ids.get(el);
    if (id === undefined) { id = 'pv-' + registry.next++; registry.ids.set(el, id); }
    return id;
  };
  const describe = (el) => {
    const attrs = [];
    for (const a of el.attributes) attrs.push([a.name, a.value]);
    const r = el.getBoundingClientRect();
    const style = el.isConnected ? getComputedStyle(el) : null;
    const shown = style !== null && style.visibility !== 'hidden' && style.display !== 'none';
    return {
      id: idOf(el),
      tag: el.tagName.toLowerCase(),
      attrs,
      text: (el.innerText || el.textContent || '').trim().slice(0, 200),
      box: shown ? { x: r.x, y: r.y, width: r.width, height: r.height } : { x: 0, y: 0, width: 0, height: 0 },
      attached: el.isConnected
    };
  };
  return Array.isArray(this) ? this.map(describe) : describe(this);
}"#;

pub const IS_CONNECTED: &str = "function() { return this.isConnected; }";

/// Uses the prototype setter so framework-managed inputs notice the change.
pub const SET_VALUE: &str = r#"function(value) {
  if (!this.isConnected) return false;
  let proto = null;
  if (this instanceof HTMLInputElement) proto = HTMLInputElement.prototype;
  else if (this instanceof HTMLTextAreaElement) proto = HTMLTextAreaElement.prototype;
  const desc = proto && Object.getOwnPropertyDescriptor(proto, 'value');
  if (desc && desc.set) desc.set.call(this, value); else this.value = value;
  return true;
}"#;

pub const DISPATCH_EVENT: &str = r#"function(type, key) {
  if (!this.isConnected) return false;
  const init = { bubbles: true, cancelable: true };
  const ev = key === null ? new Event(type, init) : new KeyboardEvent(type, { ...init, key, code: key });
  this.dispatchEvent(ev);
  return true;
}"#;

pub const CLICK: &str = r#"function() {
  if (!this.isConnected) return false;
  this.click();
  return true;
}"#;

pub const SUBMIT_FORM: &str = r#"function() {
  if (!this.isConnected) return null;
  const form = this.form || this.closest('form');
  if (!form) return false;
  if (typeof form.requestSubmit === 'function') form.requestSubmit(); else form.submit();
  return true;
}"#;

/// A submit control inside the element's form, else any visible button on
/// the page labelled search, submit, go or find.
pub const FIND_SUBMIT_BUTTON: &str = r#"function() {
  if (!this.isConnected) return null;
  const visible = (el) => { const r = el.getBoundingClientRect(); return r.width > 0 && r.height > 0; };
  const form = this.form || this.closest('form');
  if (form) {
    for (const el of form.querySelectorAll('button:not([type]), button[type=submit], input[type=submit], input[type=image]')) {
      if (visible(el)) return el;
    }
  }
  const words = new Set(['search', 'submit', 'go', 'find']);
  for (const el of document.querySelectorAll('button, input, [role=button]')) {
    if (el === this || !visible(el)) continue;
    const label = [el.textContent, el.getAttribute('aria-label'), el.getAttribute('value'), el.getAttribute('title')]
      .filter(Boolean).join(' ').toLowerCase();
    if (label.split(/[^\p{L}\p{N}]+/u).some((w) => words.has(w))) return el;
  }
  return null;
}"#;

pub const SCROLL_INTO_VIEW: &str = r#"function() {
  if (!this.isConnected) return false;
  this.scrollIntoView({ block: 'center', inline: 'nearest' });
  if (typeof this.focus === 'function') this.focus({ preventScroll: true });
  return true;
}"#;

/// Expression yielding an array of the elements matching `selector`.
pub fn query_expression(selector: &str) -> String {
    // A JSON string literal is a valid JS string literal.
    let literal = serde_json::Value::String(selector.to_string()).to_string();
    format!("Array.from(document.querySelectorAll({}))", literal)
}
