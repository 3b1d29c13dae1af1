use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use iced::widget::{container, image, text};
use iced::{keyboard, window, ContentFit, Element, Event, Length, Subscription, Task};

use fare_validator_core::rendering::infrastructure::preview_channel::PreviewFeed;
use fare_validator_core::shared::frame::Frame;

const TITLE: &str = "Transit Fare Validator";
const REFRESH: Duration = Duration::from_millis(15);

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    StopKeyPressed,
}

/// Live view of the annotated stream.
///
/// Pressing the stop key asks the validation loop to stop; the window
/// closes once the loop has finished. Closing the window also stops it.
pub struct PreviewWindow {
    feed: PreviewFeed,
    /// Disconnects when the validation worker exits.
    done: Receiver<()>,
    frame: Option<image::Handle>,
}

impl PreviewWindow {
    pub fn new(feed: PreviewFeed, done: Receiver<()>) -> Self {
        Self {
            feed,
            done,
            frame: None,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                if let Some(frame) = self.feed.latest() {
                    self.frame = Some(image::Handle::from_rgba(
                        frame.width(),
                        frame.height(),
                        to_rgba(&frame),
                    ));
                }
                if self.worker_finished() {
                    return iced::exit();
                }
            }
            Message::StopKeyPressed => {
                log::info!("Stop requested from the preview window");
                self.feed.request_stop();
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.frame {
            Some(handle) => image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => text("Waiting for camera...").size(18).into(),
        };

        container(content)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(REFRESH).map(|_| Message::Tick),
            iced::event::listen_with(stop_key),
        ])
    }

    fn worker_finished(&self) -> bool {
        !matches!(self.done.try_recv(), Err(TryRecvError::Empty))
    }
}

fn stop_key(event: Event, _status: iced::event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) if is_stop_key(&key) => {
            Some(Message::StopKeyPressed)
        }
        _ => None,
    }
}

fn is_stop_key(key: &keyboard::Key) -> bool {
    match key {
        keyboard::Key::Character(c) => {
            let mut chars = c.chars();
            matches!(
                (chars.next(), chars.next()),
                (Some(ch), None) if ch.eq_ignore_ascii_case(&crate::STOP_KEY)
            )
        }
        _ => false,
    }
}

/// Runs the window on the calling thread until it closes.
pub fn run(feed: PreviewFeed, done: Receiver<()>, size: (u32, u32)) -> iced::Result {
    iced::application(
        move || PreviewWindow::new(feed.clone(), done.clone()),
        PreviewWindow::update,
        PreviewWindow::view,
    )
    .title(TITLE)
    .subscription(PreviewWindow::subscription)
    .window(window::Settings {
        size: iced::Size::new(size.0.max(320) as f32, size.1.max(240) as f32),
        ..Default::default()
    })
    .run()
}

fn to_rgba(frame: &Frame) -> Vec<u8> {
    frame
        .data()
        .chunks_exact(3)
        .flat_map(|px| [px[0], px[1], px[2], u8::MAX])
        .collect()
}
