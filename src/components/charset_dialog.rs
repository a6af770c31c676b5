use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
pub struct CharSetOption {
    pub id: String,
    pub name: String,
}

#[derive(Properties, PartialEq, Clone)]
pub struct CharSetDialogProps {
    pub show: bool,
    pub options: Vec<CharSetOption>,
    pub selected: String,
    pub on_select: Callback<String>,
    pub on_apply: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn CharSetDialog(props: &CharSetDialogProps) -> Html {
    if !props.show {
        return html! {};
    }

    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let apply_cb = {
        let cb = props.on_apply.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let select_cb = {
        let cb = props.on_select.clone();
        Callback::from(move |e: Event| {
            if let Some(sel) = e.target_dyn_into::<HtmlSelectElement>() {
                cb.emit(sel.value());
            }
        })
    };

    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#18181b; color:#fafafa; border:1px solid #3f3f46; border-radius:12px; padding:16px 20px; min-width:320px; max-width:440px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"文字セットを選択"}</h3>
                <button onclick={close_cb.clone()} style="padding:4px 8px;">{"×"}</button>
            </div>
            <div style="font-size:13px; opacity:0.8;">{"カンバスに追加する文字カードのセットを選択します。"}</div>
            <label style="display:flex; flex-direction:column; gap:6px;">
                <span>{"文字セット"}</span>
                <select id="char-set" onchange={select_cb}>
                    { for props.options.iter().map(|o| html! {
                        <option value={o.id.clone()} selected={o.id == props.selected}>{ o.name.clone() }</option>
                    }) }
                </select>
            </label>
            <div style="border:1px solid #7f1d1d; background:rgba(127,29,29,0.25); border-radius:8px; padding:8px 10px; font-size:12px; line-height:1.5;">
                <strong>{"注意"}</strong>
                <div>{"「続行する」をクリックするとこれまでの変更はすべて破棄されます。この操作は不可逆です。"}</div>
            </div>
            <div style="display:flex; gap:8px; justify-content:flex-end;">
                <button onclick={close_cb}>{"キャンセル"}</button>
                <button onclick={apply_cb} style="background:#fafafa; color:#18181b;">{"続行する"}</button>
            </div>
        </div>
    </div>}
}
