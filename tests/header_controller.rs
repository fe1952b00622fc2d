//! Header lifecycle on a Spanish page: late mount, localization, the mobile
//! menu and page tracking, all through the public API.

use experience_ecuador::header::dom::is_hidden;
use experience_ecuador::header::{
    BootStatus, Dom, ElementId, EventTracker, Fragment, HeaderBootstrap, HeaderConfig, MenuState,
    MountEvent, Outcome, PageEvent, Panel, ScrollLock, TrackingEvent, UiEvent,
};

struct Page {
    doc: Fragment,
    mount: ElementId,
    whatsapp: ElementId,
}

struct Header {
    root: ElementId,
    switch: ElementId,
    toggle: ElementId,
    main: ElementId,
    next: ElementId,
    coast: ElementId,
    regions: ElementId,
}

fn page() -> Page {
    let mut doc = Fragment::new();
    let body = doc.body();
    let mount = doc.append(body, Fragment::element("div").attr("id", "siteHeader"));
    let content = doc.append(body, Fragment::element("main"));
    let whatsapp = doc.append(
        content,
        Fragment::element("a")
            .attr("href", "https://wa.me/593999999999")
            .text("  Escríbenos por WhatsApp "),
    );
    Page {
        doc,
        mount,
        whatsapp,
    }
}

/// What the include loader injects.
fn inject_header(page: &mut Page) -> Header {
    let doc = &mut page.doc;
    let root = doc.append(page.mount, Fragment::element("header").attr("class", "topbar"));
    let switch = doc.append(
        root,
        Fragment::element("a").attr("class", "nav-link").attr("data-lang-switch", ""),
    );
    let toggle = doc.append(
        root,
        Fragment::element("input").attr("id", "eeNavToggle").attr("type", "checkbox"),
    );
    let nav = doc.append(root, Fragment::element("nav").attr("class", "nav-mobile"));
    let main = doc.append(nav, Fragment::element("div").attr("class", "m-main"));
    let next = doc.append(
        main,
        Fragment::element("button")
            .attr("class", "m-next")
            .attr("data-target", "#m-regions"),
    );
    let coast = doc.append(main, Fragment::element("a").attr("href", "/regions/coast/"));
    let regions = doc.append(
        nav,
        Fragment::element("div").attr("class", "m-submenu").attr("id", "m-regions"),
    );
    doc.append(regions, Fragment::element("button").attr("data-back", ""));
    Header {
        root,
        switch,
        toggle,
        main,
        next,
        coast,
        regions,
    }
}

#[test]
fn test_late_mount_binds_once_and_localizes() {
    let mut page = page();
    let mut boot = HeaderBootstrap::new(HeaderConfig::default(), "/es/regiones/andes", 390).unwrap();

    assert_eq!(
        boot.on_event(&mut page.doc, MountEvent::ChildInserted),
        BootStatus::Pending
    );
    assert_eq!(
        boot.dispatch(&mut page.doc, &UiEvent::key("Escape")),
        Outcome::Ignored
    );

    let header = inject_header(&mut page);
    assert_eq!(
        boot.on_event(&mut page.doc, MountEvent::HeaderMounted),
        BootStatus::Bound(header.root)
    );
    assert!(!boot.is_observing());
    assert_eq!(
        boot.on_event(&mut page.doc, MountEvent::ChildInserted),
        BootStatus::Disconnected
    );
    assert_eq!(
        boot.on_event(&mut page.doc, MountEvent::WindowLoad),
        BootStatus::AlreadyBound(header.root)
    );

    let doc = &page.doc;
    assert_eq!(doc.document_lang(), Some("es"));
    assert_eq!(doc.attr(header.switch, "href"), Some("/regions/andes/"));
    assert_eq!(doc.text(header.switch), "EN");
    assert_eq!(doc.attr(header.coast, "href"), Some("/es/regiones/costa/"));
    // Content outside the header is left alone.
    assert_eq!(doc.attr(page.whatsapp, "href"), Some("https://wa.me/593999999999"));
}

#[test]
fn test_mobile_menu_session() {
    let mut page = page();
    let mut boot = HeaderBootstrap::new(HeaderConfig::default(), "/es/regiones/andes/", 390).unwrap();
    let header = inject_header(&mut page);
    boot.on_event(&mut page.doc, MountEvent::HeaderMounted);

    boot.dispatch(&mut page.doc, &UiEvent::click(header.toggle));
    assert_eq!(page.doc.scroll_lock(), ScrollLock::engaged(true));
    assert_eq!(page.doc.attr(header.toggle, "aria-expanded"), Some("true"));

    boot.dispatch(&mut page.doc, &UiEvent::click(header.next));
    assert_eq!(
        boot.controller().unwrap().state(),
        &MenuState::Expanded(Panel::Submenu("#m-regions".to_string()))
    );
    assert!(is_hidden(&page.doc, header.main));
    assert!(!is_hidden(&page.doc, header.regions));

    boot.dispatch(&mut page.doc, &UiEvent::key("Escape"));
    assert_eq!(boot.controller().unwrap().state(), &MenuState::Collapsed);
    assert_eq!(page.doc.scroll_lock(), ScrollLock::RELEASED);

    // Reopening starts on the main panel.
    boot.dispatch(&mut page.doc, &UiEvent::click(header.toggle));
    assert_eq!(
        boot.controller().unwrap().state(),
        &MenuState::Expanded(Panel::Main)
    );
    assert!(!is_hidden(&page.doc, header.main));
    assert!(is_hidden(&page.doc, header.regions));

    let outcome = boot.dispatch(&mut page.doc, &UiEvent::click(header.switch));
    assert_eq!(outcome, Outcome::Navigate("/regions/andes/".to_string()));
    assert_eq!(boot.controller().unwrap().state(), &MenuState::Collapsed);
}

#[test]
fn test_whatsapp_click_is_tracked() {
    let mut page = page();
    inject_header(&mut page);
    let mut tracker = EventTracker::new(&page.doc, "/es/regiones/andes/");
    assert!(!tracker.is_trip_builder_page());

    let mut events: Vec<TrackingEvent> = Vec::new();
    tracker.observe(
        &page.doc,
        PageEvent::Click {
            target: page.whatsapp,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![TrackingEvent::WhatsappClick {
            link_url: "https://wa.me/593999999999".to_string(),
            link_text: "Escríbenos por WhatsApp".to_string(),
            page_path: "/es/regiones/andes/".to_string(),
        }]
    );
    let wire = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(wire["event"], "whatsapp_click");
}
