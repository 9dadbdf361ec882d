use dioxus::prelude::*;

const BUILDERZ_SYMBOL: Asset = asset!("/assets/images/builderz-symbol.svg");
const SOLANA_LOGO: Asset = asset!("/assets/images/sol.svg");

/// The builderz and Solana marks shown above the account card.
#[component]
pub fn Branding() -> Element {
    rsx! {
        div {
            style: "display: flex; flex-direction: row; align-items: center; justify-content: center; gap: 2rem;",
            a {
                href: "https://builderz.build",
                target: "_blank",
                rel: "noopener noreferrer",
                img {
                    src: BUILDERZ_SYMBOL,
                    height: "60",
                    width: "50",
                    style: "object-fit: contain;",
                    alt: "builderz",
                }
            }
            img {
                src: SOLANA_LOGO,
                height: "75",
                width: "75",
                alt: "sol",
            }
        }
    }
}
