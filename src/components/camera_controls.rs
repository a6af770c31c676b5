use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CameraControlsProps {
    pub on_open_charsets: Callback<()>,
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    pub on_home: Callback<()>,
}

#[function_component(CameraControls)]
pub fn camera_controls(props: &CameraControlsProps) -> Html {
    let cs = {
        let cb = props.on_open_charsets.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let zi = {
        let cb = props.on_zoom_in.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let zo = {
        let cb = props.on_zoom_out.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let home = {
        let cb = props.on_home.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div style="position:absolute; top:16px; right:16px; z-index:10; display:flex; gap:8px;">
        <button onclick={cs} style="padding:6px 12px;">{"文字セット"}</button>
        <button onclick={zo} title="Zoom out" style="padding:6px 10px;">{"-"}</button>
        <button onclick={zi} title="Zoom in" style="padding:6px 10px;">{"+"}</button>
        <button onclick={home} title="Home" style="padding:6px 10px;">{"⌂"}</button>
    </div>}
}
