//! The widgets demo wired against a [`Dispatcher`], with a toolkit simulated
//! by emitting the signals a user's clicks and drags would produce.
use std::error::Error;
use std::sync::mpsc;
use std::thread;

use tracing::{info, warn};
use widget_signals::signal::{
    ActionSignal, ButtonSignal, ComboBoxSignal, DialogSignal, SliderSignal, SpinBoxSignal,
    TextFieldSignal,
};
use widget_signals::styles::{Properties, StyleSheet};
use widget_signals::widget::{
    Action, Button, CheckBox, ComboBox, Dialog, ScrollBar, Slider, SpinBox, TextField, Window,
};
use widget_signals::{App, Dispatcher, Payload, Widget};

const ABOUT: &str = "This is a demo of the main widgets and general functionality \
                     of a signal-driven graphical interface.";

/// Work the callbacks hand back to the event loop.
enum Request {
    Prompt(Widget<Dialog>),
    Close(Widget<Window>),
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut app = App::new("widgets")
        .with_about(ABOUT)
        .with_style_sheet(
            StyleSheet::new()
                .with_rule(
                    "button",
                    Properties::new().with("background-color", "#FFF0F0FF"),
                )
                .with_rule(
                    "#combo",
                    Properties::new().with("background-color", "#F0FFF0FF"),
                )
                .with_rule(
                    ".hslides",
                    Properties::new().with("background-color", "#F0E0FFFF"),
                )
                .with_rule("kbd", Properties::new().with("color", "blue")),
        )
        .with_tracing();
    let (requests, pending_requests) = mpsc::channel();
    let window = app.new_window("gogi-widgets-demo");
    let dispatcher = app.dispatcher().clone();

    // Buttons
    let button1 = dispatcher.create_child::<Button>(&window, "button1")?;
    for signal in ButtonSignal::ALL {
        dispatcher.connect(
            &button1,
            *signal,
            (dispatcher.clone(), requests.clone(), window.clone()),
            button1_signal,
        )?;
    }
    let button2 = dispatcher.create_child::<Button>(&window, "button2")?;
    for signal in ButtonSignal::ALL {
        dispatcher.connect(&button2, *signal, (), button_signal)?;
    }
    let checkbox = dispatcher.create_child::<CheckBox>(&window, "checkbox")?;
    dispatcher.connect(&checkbox, ButtonSignal::Toggled, (), |(), checkbox, _, state| {
        info!(
            "check box {} is now {}",
            checkbox.name(),
            if state.as_bool().unwrap_or_default() { "on" } else { "off" }
        );
    })?;

    let menu_button = dispatcher.create_child::<Button>(&window, "menubutton1")?;
    let item1 = dispatcher.create_child::<Action>(&menu_button, "Menu Item 1")?;
    dispatcher.connect(&item1, ActionSignal::Triggered, Payload::from(1), menu_triggered)?;
    // "Menu Item 2" only opens its submenu.
    let item2 = dispatcher.create_child::<Action>(&menu_button, "Menu Item 2")?;
    let sub_item = dispatcher.create_child::<Action>(&item2, "Sub Menu Item 2")?;
    dispatcher.connect(&sub_item, ActionSignal::Triggered, Payload::from(2.1), menu_triggered)?;
    let item3 = dispatcher.create_child::<Action>(&menu_button, "Menu Item 3")?;
    dispatcher.connect(&item3, ActionSignal::Triggered, Payload::from(3), menu_triggered)?;
    let menu = [item1, sub_item, item3];

    // Sliders
    let mut sliders = Vec::new();
    for name in ["slider1", "slider2"] {
        let slider = dispatcher.create_child::<Slider>(&window, name)?;
        for signal in SliderSignal::ALL {
            dispatcher.connect(&slider, *signal, (), slider_signal)?;
        }
        sliders.push(slider);
    }
    let mut scroll_bars = Vec::new();
    for name in ["scrollbar1", "scrollbar2"] {
        let scroll_bar = dispatcher.create_child::<ScrollBar>(&window, name)?;
        for signal in SliderSignal::ALL {
            dispatcher.connect(&scroll_bar, *signal, (), scroll_signal)?;
        }
        scroll_bars.push(scroll_bar);
    }

    // Text widgets
    let edit1 = dispatcher.create_child::<TextField>(&window, "edit1")?;
    for signal in TextFieldSignal::ALL {
        dispatcher.connect(&edit1, *signal, String::new(), text_signal)?;
    }
    let spin = dispatcher.create_child::<SpinBox>(&window, "spin")?;
    dispatcher.connect(&spin, SpinBoxSignal::ValueChanged, (), |(), spin, signal, value| {
        info!("received spin box signal {signal} from {} value: {value}", spin.name());
    })?;
    let combo = dispatcher.create_child::<ComboBox>(&window, "combo")?;
    dispatcher.connect(
        &combo,
        ComboBoxSignal::Selected,
        vec!["Item1", "AnotherItem", "Item3"],
        |items: &mut Vec<&'static str>, combo, signal, index| {
            let item = index
                .as_index()
                .and_then(|index| items.get(index))
                .unwrap_or(&"<none>");
            info!("received combo box signal {signal} from {} item: {item}", combo.name());
        },
    )?;
    for (selector, properties) in app.style_sheet().matching(combo.kind(), combo.name()) {
        info!("{selector} styles {}: {properties:?}", combo.name());
    }

    // Main menu
    let file_menu = dispatcher.create_child::<Action>(&window, "File")?;
    for label in ["New", "Open", "Save", "Save As.."] {
        let item = dispatcher.create_child::<Action>(&file_menu, label)?;
        dispatcher.connect(&item, ActionSignal::Triggered, Payload::None, menu_triggered)?;
    }
    let close_item = dispatcher.create_child::<Action>(&file_menu, "Close Window")?;
    dispatcher.connect(
        &close_item,
        ActionSignal::Triggered,
        (requests.clone(), window.clone()),
        |(requests, window): &mut (mpsc::Sender<Request>, Widget<Window>), action, _, _| {
            info!("received menu action from {}", action.name());
            let _ = requests.send(Request::Close(window.clone()));
        },
    )?;
    let edit_menu = dispatcher.create_child::<Action>(&window, "Edit")?;
    for label in ["Copy", "Cut", "Paste"] {
        let item = dispatcher.create_child::<Action>(&edit_menu, label)?;
        dispatcher.connect(&item, ActionSignal::Triggered, Payload::None, menu_triggered)?;
    }
    drop(requests);

    // What a user might do in the first few seconds.
    dispatcher.emit(&button1, ButtonSignal::Pressed, ())?;
    dispatcher.emit(&button1, ButtonSignal::Released, ())?;
    dispatcher.emit(&button1, ButtonSignal::Clicked, ())?;
    handle_requests(&mut app, &pending_requests)?;

    dispatcher.emit(&button2, ButtonSignal::Clicked, ())?;
    dispatcher.emit(&checkbox, ButtonSignal::Toggled, true)?;
    for item in &menu {
        dispatcher.emit(item, ActionSignal::Triggered, ())?;
    }

    dispatcher.emit(&sliders[0], SliderSignal::DragStarted, 0.5)?;
    dispatcher.emit(&sliders[0], SliderSignal::ValueChanged, 0.75)?;
    dispatcher.emit(&sliders[0], SliderSignal::DragEnded, 0.75)?;
    dispatcher.emit(&scroll_bars[1], SliderSignal::ValueChanged, 0.5)?;

    for text in ["H", "He", "Hel"] {
        dispatcher.emit(&edit1, TextFieldSignal::Inserted, text)?;
    }
    dispatcher.emit(&edit1, TextFieldSignal::Backspaced, "He")?;
    dispatcher.emit(&edit1, TextFieldSignal::Done, "Hello")?;
    dispatcher.emit(&spin, SpinBoxSignal::ValueChanged, 3.)?;
    dispatcher.emit(&combo, ComboBoxSignal::Selected, 1_usize)?;

    // A background task animating the vertical slider.
    let sender = dispatcher.sender();
    let slider2 = sliders[1].clone();
    thread::spawn(move || {
        for step in 1..=4_u8 {
            if sender
                .send(&slider2, SliderSignal::Moved, f64::from(step) / 4.)
                .is_err()
            {
                break;
            }
        }
    })
    .join()
    .map_err(|_| "slider animation panicked")?;
    for err in dispatcher.process_pending() {
        warn!("queued emission failed: {err}");
    }

    dispatcher.emit(&close_item, ActionSignal::Triggered, ())?;
    handle_requests(&mut app, &pending_requests)?;

    if let Err(errors) = app.close_all() {
        for err in errors {
            warn!("error closing window: {err}");
        }
    }
    Ok(())
}

fn handle_requests(
    app: &mut App,
    requests: &mpsc::Receiver<Request>,
) -> Result<(), Box<dyn Error>> {
    for request in requests.try_iter() {
        match request {
            Request::Prompt(dialog) => {
                // The user types a value and presses OK.
                app.dispatcher()
                    .emit(&dialog, DialogSignal::Accepted, "forty-two")?;
                app.dispatcher().destroy_widget(&dialog)?;
            }
            Request::Close(window) => app.request_close(&window)?,
        }
    }
    Ok(())
}

fn button_signal(_: &mut (), button: &Widget<Button>, signal: ButtonSignal, _: &Payload) {
    info!("received button signal {signal} from button: {}", button.name());
}

fn button1_signal(
    (dispatcher, requests, window): &mut (Dispatcher, mpsc::Sender<Request>, Widget<Window>),
    button: &Widget<Button>,
    signal: ButtonSignal,
    payload: &Payload,
) {
    button_signal(&mut (), button, signal, payload);
    if signal != ButtonSignal::Clicked {
        return;
    }

    let dialog = match dispatcher.create_child::<Dialog>(&*window, "Button1 Dialog") {
        Ok(dialog) => dialog,
        Err(err) => {
            warn!("unable to open dialog: {err}");
            return;
        }
    };
    for signal in DialogSignal::ALL {
        if let Err(err) = dispatcher.connect(&dialog, *signal, (), string_dialog) {
            warn!("unable to connect dialog: {err}");
        }
    }
    let _ = requests.send(Request::Prompt(dialog));
}

fn string_dialog(_: &mut (), _: &Widget<Dialog>, signal: DialogSignal, value: &Payload) {
    if signal == DialogSignal::Accepted {
        info!("got string value: {}", value.as_text().unwrap_or_default());
    }
}

fn menu_triggered(data: &mut Payload, action: &Widget<Action>, _: ActionSignal, _: &Payload) {
    if data.is_none() {
        info!("received menu action from {}", action.name());
    } else {
        info!("received menu action from {} data: {data}", action.name());
    }
}

fn slider_signal(_: &mut (), slider: &Widget<Slider>, signal: SliderSignal, value: &Payload) {
    info!("received slider signal {signal} from slider: {} value: {value}", slider.name());
}

fn scroll_signal(
    _: &mut (),
    scroll_bar: &Widget<ScrollBar>,
    signal: SliderSignal,
    value: &Payload,
) {
    info!(
        "received scroll signal {signal} from scroll bar: {} value: {value}",
        scroll_bar.name()
    );
}

fn text_signal(
    contents: &mut String,
    field: &Widget<TextField>,
    signal: TextFieldSignal,
    text: &Payload,
) {
    if let Some(text) = text.as_text() {
        text.clone_into(contents);
    }
    info!("received text signal {signal} from field: {} value: {contents:?}", field.name());
}
