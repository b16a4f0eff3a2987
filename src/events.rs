// Listener registry. Everything attached here is removed again by `clear`,
// so a disposed background leaves no handlers behind on window or document.

use crate::constants::THEME_ATTRIBUTE;
use smallvec::SmallVec;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

struct ClassObserver {
    observer: web::MutationObserver,
    _closure: Closure<dyn FnMut()>,
}

#[derive(Default)]
pub struct Listeners {
    entries: SmallVec<[Listener; 6]>,
    observer: Option<ClassObserver>,
}

impl Listeners {
    pub fn add(
        &mut self,
        target: &web::EventTarget,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<()> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &opts,
            )
            .map_err(|e| anyhow::anyhow!("add {} listener: {:?}", kind, e))?;
        self.entries.push(Listener {
            target: target.clone(),
            kind,
            closure,
        });
        Ok(())
    }

    /// Call `handler` whenever the class attribute of `el` changes.
    pub fn observe_class(
        &mut self,
        el: &web::Element,
        handler: impl FnMut() + 'static,
    ) -> anyhow::Result<()> {
        if self.observer.is_some() {
            anyhow::bail!("class observer already attached");
        }
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        let observer = web::MutationObserver::new(closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("MutationObserver: {:?}", e))?;
        let init = web::MutationObserverInit::new();
        init.set_attributes(true);
        init.set_attribute_filter(&js_sys::Array::of1(&THEME_ATTRIBUTE.into()));
        observer
            .observe_with_options(el, &init)
            .map_err(|e| anyhow::anyhow!("observe: {:?}", e))?;
        self.observer = Some(ClassObserver {
            observer,
            _closure: closure,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len() + usize::from(self.observer.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        for l in self.entries.drain(..) {
            _ = l
                .target
                .remove_event_listener_with_callback(l.kind, l.closure.as_ref().unchecked_ref());
        }
        if let Some(obs) = self.observer.take() {
            obs.observer.disconnect();
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.clear();
    }
}
